//! Line-oriented request protocol.
//!
//! Every request is one `\n`-terminated line and gets exactly one response
//! line. A line starting with `{` is a JSON action, anything else a plain-text
//! command. Both flavors may be mixed on one connection; the response is
//! encoded in the flavor of the request that produced it.
//!
//! | Text                         | JSON action                                   |
//! |------------------------------|-----------------------------------------------|
//! | `VIEW_PRODUCTS`              | `{"action":"get_product_list"}`               |
//! | `GET_PRODUCT_DETAILS <id>`   | `{"action":"get_product_details","id":1}`     |
//! | `ADD_TO_CART <id> <qty>`     | `{"action":"add_to_cart","id":1,"quantity":2}`|
//! | `VIEW_CART`                  | `{"action":"view_cart"}`                      |
//! | `CHECKOUT`                   | `{"action":"checkout"}`                       |
//! | -                            | `{"action":"checkout","cart":[{"id":1,"quantity":2}]}` |

mod error;
mod request;
mod response;

pub use error::*;
pub use request::*;
pub use response::*;

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use serde_json::{json, Value};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::TcpStream;

    use crate::app_system::{ReservationMode, ServerConfig, ShopSystem};
    use crate::clients::CatalogClient;
    use crate::domain::Product;

    struct TestClient {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl TestClient {
        async fn connect(addr: SocketAddr) -> Self {
            let (read, writer) = TcpStream::connect(addr).await.unwrap().into_split();
            Self { reader: BufReader::new(read), writer }
        }

        async fn request(&mut self, line: &str) -> String {
            self.writer.write_all(format!("{line}\n").as_bytes()).await.unwrap();
            self.read_line().await
        }

        async fn request_bytes(&mut self, bytes: &[u8]) -> String {
            self.writer.write_all(bytes).await.unwrap();
            self.read_line().await
        }

        async fn request_json(&mut self, line: &str) -> Value {
            serde_json::from_str(&self.request(line).await).unwrap()
        }

        async fn read_line(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line.trim_end().to_string()
        }

        /// True once the server has closed its side (EOF or reset).
        async fn is_closed(&mut self) -> bool {
            let mut line = String::new();
            matches!(self.reader.read_line(&mut line).await, Ok(0) | Err(_))
        }
    }

    async fn start_server(mode: ReservationMode, products: Vec<Product>) -> (SocketAddr, CatalogClient) {
        let config = ServerConfig {
            port: 0,
            reservation_mode: mode,
            max_line_length: 256,
            ..ServerConfig::default()
        };
        let system = ShopSystem::with_products(&config, products);
        let listener = system.bind(&config).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(listener.run());
        (addr, system.catalog.clone())
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new(1, "Python Programming eBook", 10.99, 5),
            Product::new(2, "Mystery Gift", 20.99, 1),
        ]
    }

    async fn stock_of(catalog: &CatalogClient, id: u32) -> u32 {
        catalog.get(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_browse_add_view_checkout() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;

        let listing = client.request_json("VIEW_PRODUCTS").await;
        assert_eq!(
            listing,
            json!([
                { "id": 1, "name": "Python Programming eBook", "price": 10.99, "stock": 5 },
                { "id": 2, "name": "Mystery Gift", "price": 20.99, "stock": 1 }
            ])
        );

        assert_eq!(client.request("ADD_TO_CART 1 2").await, "Added 2 of Python Programming eBook to cart.");
        assert_eq!(client.request("ADD_TO_CART 1 3").await, "Added 3 of Python Programming eBook to cart.");
        assert_eq!(
            client.request_json("VIEW_CART").await,
            json!([{ "id": 1, "name": "Python Programming eBook", "quantity": 5, "price": 10.99 }])
        );

        assert_eq!(
            client.request_json("CHECKOUT").await,
            json!({ "success": true, "message": "Checkout successful." })
        );
        assert_eq!(stock_of(&catalog, 1).await, 0);
        assert_eq!(client.request_json("VIEW_CART").await, json!([]));
    }

    #[tokio::test]
    async fn test_sequential_checkouts_second_is_refused() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;

        client.request("ADD_TO_CART 1 3").await;
        assert_eq!(client.request_json("CHECKOUT").await["success"], json!(true));
        assert_eq!(stock_of(&catalog, 1).await, 2);

        client.request("ADD_TO_CART 1 3").await;
        assert_eq!(
            client.request_json("CHECKOUT").await,
            json!({ "success": false, "message": "Insufficient stock for Python Programming eBook." })
        );
        assert_eq!(stock_of(&catalog, 1).await, 2);
    }

    #[tokio::test]
    async fn test_errors_do_not_close_the_session() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;

        assert_eq!(client.request("ADD_TO_CART 99 1").await, "ERR ProductNotFound: Product ID 99 not found.");
        assert!(client.request("ADD_TO_CART abc 1").await.starts_with("ERR MalformedRequest:"));
        assert!(client.request("ADD_TO_CART 1 0").await.starts_with("ERR MalformedRequest:"));
        assert_eq!(client.request("DANCE").await, "ERR UnknownCommand: Unknown command: DANCE");

        assert_eq!(client.request_json("VIEW_CART").await, json!([]));
        assert_eq!(stock_of(&catalog, 1).await, 5);
        assert_eq!(
            client.request_json("GET_PRODUCT_DETAILS 2").await,
            json!({ "id": 2, "name": "Mystery Gift", "price": 20.99, "stock": 1 })
        );
    }

    #[tokio::test]
    async fn test_overlong_line_is_rejected_and_session_closed() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;
        client.request("ADD_TO_CART 1 1").await;

        assert_eq!(
            client.request(&"X".repeat(300)).await,
            "ERR MalformedRequest: Request line too long"
        );
        assert!(client.is_closed().await);
        assert_eq!(stock_of(&catalog, 1).await, 5);

        let mut next = TestClient::connect(addr).await;
        assert_eq!(next.request_json("VIEW_CART").await, json!([]));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected_and_session_survives() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;
        assert_eq!(client.request("ADD_TO_CART 1 1").await, "Added 1 of Python Programming eBook to cart.");

        assert_eq!(
            client.request_bytes(b"ADD_TO_CART \xff 1\n").await,
            "ERR MalformedRequest: Request is not valid UTF-8"
        );

        assert_eq!(
            client.request_json("VIEW_CART").await,
            json!([{ "id": 1, "name": "Python Programming eBook", "quantity": 1, "price": 10.99 }])
        );
        assert_eq!(stock_of(&catalog, 1).await, 5);
    }

    #[tokio::test]
    async fn test_json_session_add_view_checkout() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;

        assert_eq!(
            client.request_json(r#"{"action":"add_to_cart","id":1,"quantity":2}"#).await,
            json!({ "success": true, "message": "Added 2 of Python Programming eBook to cart." })
        );
        assert_eq!(
            client.request_json(r#"{"action":"view_cart"}"#).await,
            json!([{ "id": 1, "name": "Python Programming eBook", "quantity": 2, "price": 10.99 }])
        );

        assert_eq!(
            client.request_json(r#"{"action":"checkout"}"#).await,
            json!({ "success": true, "message": "Checkout successful." })
        );
        assert_eq!(stock_of(&catalog, 1).await, 3);
        assert_eq!(client.request_json(r#"{"action":"view_cart"}"#).await, json!([]));
    }

    #[tokio::test]
    async fn test_json_action_flavor() {
        let (addr, catalog) = start_server(ReservationMode::AtCheckout, products()).await;
        let mut client = TestClient::connect(addr).await;

        let listing = client.request_json(r#"{"action":"get_product_list"}"#).await;
        assert_eq!(listing.as_array().map(Vec::len), Some(2));

        let refused = client
            .request_json(r#"{"action":"checkout","cart":[{"id":1,"quantity":2},{"id":2,"quantity":2}]}"#)
            .await;
        assert_eq!(refused, json!({ "success": false, "message": "Insufficient stock for Mystery Gift." }));
        assert_eq!(stock_of(&catalog, 1).await, 5);

        let accepted = client
            .request_json(r#"{"action":"checkout","cart":[{"id":1,"quantity":2},{"id":2,"quantity":1}]}"#)
            .await;
        assert_eq!(accepted["success"], json!(true));
        assert_eq!(stock_of(&catalog, 1).await, 3);
        assert_eq!(stock_of(&catalog, 2).await, 0);

        assert_eq!(
            client.request_json(r#"{"action":"teleport"}"#).await,
            json!({ "error": "UnknownCommand", "message": "Unknown command: teleport" })
        );
        assert_eq!(
            client.request_json(r#"{"action":"add_to_cart","id":99,"quantity":1}"#).await["error"],
            json!("ProductNotFound")
        );
    }

    #[tokio::test]
    async fn test_concurrent_clients_never_oversell() {
        const STOCK: u32 = 5;
        const CLIENTS: usize = 12;

        let (addr, catalog) =
            start_server(ReservationMode::AtCheckout, vec![Product::new(1, "Book", 1.0, STOCK)]).await;

        let mut tasks = Vec::new();
        for _ in 0..CLIENTS {
            tasks.push(tokio::spawn(async move {
                let mut client = TestClient::connect(addr).await;
                client.request("ADD_TO_CART 1 1").await;
                client.request_json("CHECKOUT").await["success"] == json!(true)
            }));
        }

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, STOCK as usize);
        assert_eq!(stock_of(&catalog, 1).await, 0);
    }

    #[tokio::test]
    async fn test_on_add_mode_releases_stock_on_disconnect() {
        let (addr, catalog) = start_server(ReservationMode::OnAdd, products()).await;

        let mut client = TestClient::connect(addr).await;
        assert_eq!(client.request("ADD_TO_CART 1 4").await, "Added 4 of Python Programming eBook to cart.");
        assert_eq!(stock_of(&catalog, 1).await, 1);

        let mut rival = TestClient::connect(addr).await;
        assert_eq!(
            rival.request("ADD_TO_CART 1 2").await,
            "ERR InsufficientStock: Insufficient stock for Python Programming eBook."
        );

        drop(client);
        for _ in 0..50 {
            if stock_of(&catalog, 1).await == 5 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert_eq!(stock_of(&catalog, 1).await, 5);
        assert_eq!(rival.request("ADD_TO_CART 1 2").await, "Added 2 of Python Programming eBook to cart.");
    }
}

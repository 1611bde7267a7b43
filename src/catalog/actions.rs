/// Stock actions the catalog actor applies to a single product.
///
/// Each action runs to completion inside the actor before the next request
/// is taken, so the stock check and the decrement can never be split.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Decrements stock by the amount if enough is available.
    TryReserve(u32),
    /// Adds the amount back to stock. Used to undo a reservation.
    Release(u32),
}

/// Results from CatalogActions - variants match 1:1 with CatalogAction
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogActionResult {
    /// Result from TryReserve: whether stock was taken, and what is left
    TryReserve { reserved: bool, stock: u32 },
    /// Result from Release: the stock level after the release
    Release { stock: u32 },
}

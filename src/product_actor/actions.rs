/// Custom actions for Product entities.
///
/// These actions represent stock operations beyond plain edits.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes stock for a checkout line.
    ///
    /// # Errors
    /// Fails if the requested amount exceeds tracked stock.
    ReserveStock(u32),
    /// Returns stock from a removed order.
    Restock(u32),
}

/// Results from ProductActions
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level; `None` when stock is untracked.
    StockLevel(Option<i64>),
    /// Stock was taken, or the product does not track stock.
    Reserved,
    /// New stock level after restocking; `None` when nothing was changed.
    Restocked(Option<i64>),
}

//! Custom actions for the Catalog actor.

/// Catalog reads beyond plain `get`/`list`.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Current stock level. Read-only; never broadcast as a change.
    CheckStock,
}

/// Results from CatalogActions - variants match 1:1 with CatalogAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogActionResult {
    CheckStock(u32),
}

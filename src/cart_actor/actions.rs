//! Custom actions for the Cart actor.
//!
//! Every change to the session cart is one of these, processed in arrival order by the
//! actor that owns the cart. See [`impl ActorEntity for Cart`](crate::model::Cart) for the
//! rules each action enforces.

use crate::model::{CatalogProduct, CustomBuildLine, LineId};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds to the existing line for this product, or appends a new one.
    ///
    /// # Errors
    /// Fails with `InvalidQuantity` when `quantity` is 0.
    AddProduct {
        product: CatalogProduct,
        quantity: u32,
    },
    /// Appends a materialized build. A line with the same id is replaced in place.
    AddCustomBuild(CustomBuildLine),
    /// Overwrites a line's quantity. Zero or below removes the line.
    UpdateQuantity { line_id: LineId, quantity: i64 },
    /// Removes a line. Removing an unknown id is a no-op.
    RemoveLine(LineId),
    Clear,
}

/// Results from CartActions - variants match 1:1 with CartAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartActionResult {
    /// Identity of the line that was created or grown.
    AddProduct(LineId),
    AddCustomBuild(LineId),
    /// New quantity, or `None` when the line was removed.
    UpdateQuantity(Option<u32>),
    /// Whether a line was actually removed.
    RemoveLine(bool),
    /// Number of lines dropped.
    Clear(usize),
}

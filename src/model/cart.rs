/// The session cart and its two kinds of line.
///
/// # Actor Framework
/// [`Cart`] implements [`ActorEntity`](storefront_actor::ActorEntity); every mutation goes
/// through a [`CartAction`](crate::cart_actor::CartAction) so one actor owns the line list.
use super::build::{ComponentSlot, SelectedComponent};
use super::product::{CatalogProduct, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Opaque identity of a cart line.
///
/// Product lines use the product id; custom builds use their generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&ProductId> for LineId {
    fn from(id: &ProductId) -> Self {
        Self(id.0.clone())
    }
}

impl From<&str> for LineId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Type-safe identifier for carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartId(pub u32);

impl Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cart_{}", self.0)
    }
}

/// A catalog product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub product: CatalogProduct,
    pub quantity: u32,
}

/// A materialized PC build. Name, price and components are frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBuildLine {
    pub id: LineId,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub build_components: BTreeMap<ComponentSlot, SelectedComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A cart line, tagged on the wire as `"product"` or `"customBuild"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CartLineItem {
    Product(ProductLine),
    CustomBuild(CustomBuildLine),
}

impl CartLineItem {
    pub fn id(&self) -> LineId {
        match self {
            CartLineItem::Product(line) => LineId::from(&line.product.id),
            CartLineItem::CustomBuild(line) => line.id.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CartLineItem::Product(line) => &line.product.name,
            CartLineItem::CustomBuild(line) => &line.name,
        }
    }

    pub fn unit_price(&self) -> u64 {
        match self {
            CartLineItem::Product(line) => line.product.price,
            CartLineItem::CustomBuild(line) => line.price,
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            CartLineItem::Product(line) => line.quantity,
            CartLineItem::CustomBuild(line) => line.quantity,
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        match self {
            CartLineItem::Product(line) => line.quantity = quantity,
            CartLineItem::CustomBuild(line) => line.quantity = quantity,
        }
    }

    /// Price × quantity, or `None` if it does not fit in a `u64`.
    pub fn checked_line_total(&self) -> Option<u64> {
        self.unit_price().checked_mul(u64::from(self.quantity()))
    }

    /// Saturates at `u64::MAX`; the cart actor never holds a line whose total overflows.
    pub fn line_total(&self) -> u64 {
        self.unit_price().saturating_mul(u64::from(self.quantity()))
    }

    pub fn is_custom_build(&self) -> bool {
        matches!(self, CartLineItem::CustomBuild(_))
    }
}

/// Ordered line items; insertion order is display order and identities are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
        }
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity())).sum()
    }

    /// Sum of price × quantity. Computed on every call, never cached.
    pub fn total_price(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.line_total()))
    }

    /// The total, or `None` if any line total or the sum overflows.
    pub fn checked_total(&self) -> Option<u64> {
        self.lines
            .iter()
            .try_fold(0u64, |total, line| total.checked_add(line.checked_line_total()?))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find(&self, id: &LineId) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| &l.id() == id)
    }

    pub(crate) fn position(&self, id: &LineId) -> Option<usize> {
        self.lines.iter().position(|l| &l.id() == id)
    }
}

/// Creation payload for the session cart. Lines come from storage, not the caller.
#[derive(Debug, Clone, Default)]
pub struct CartCreate;

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(quantity: u32) -> CartLineItem {
        CartLineItem::Product(ProductLine {
            product: CatalogProduct::new("KB01", "Keychron K2", 1_990_000, 5),
            quantity,
        })
    }

    #[test]
    fn test_aggregates() {
        let mut cart = Cart::new(CartId(1));
        cart.lines.push(keyboard(2));
        cart.lines.push(CartLineItem::CustomBuild(CustomBuildLine {
            id: LineId::new("custom-build-1-a"),
            name: "Gaming build".into(),
            price: 15_900_000,
            quantity: 1,
            build_components: BTreeMap::new(),
            use_case: None,
            created_at: Utc::now(),
        }));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price(), 2 * 1_990_000 + 15_900_000);
        assert!(cart.find(&LineId::from("KB01")).is_some());
        assert_eq!(cart.position(&LineId::from("custom-build-1-a")), Some(1));
    }

    #[test]
    fn test_line_kind_tag() {
        let json = serde_json::to_value(keyboard(1)).unwrap();
        assert_eq!(json["kind"], "product");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["product"]["id"], "KB01");
    }
}

//! ActorEntity implementation for the session [`Cart`].
//!
//! The cart's durable storage arrives as the actor context. Lines are read back in
//! `on_create` and written after every action that changed them.

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::model::{Cart, CartCreate, CartId, CartLineItem, CustomBuildLine, LineId, ProductLine};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;
use storefront_actor::ActorEntity;
use tracing::{debug, info, warn};

/// Where the cart lines live between sessions.
#[derive(Clone)]
pub struct CartStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored lines, or an empty list when nothing usable is stored.
    ///
    /// Unreadable or unparsable data is logged and treated as an empty cart.
    pub async fn load(&self) -> Vec<CartLineItem> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cart storage unreadable, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
            Ok(lines) => sanitize(lines),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored cart is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Failures are logged; the in-memory cart stays authoritative.
    pub async fn save(&self, lines: &[CartLineItem]) {
        let json = match serde_json::to_string(lines) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cart not serializable");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json).await {
            warn!(key = %self.key, error = %e, "Cart not persisted");
        }
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage").field("key", &self.key).finish()
    }
}

/// Drops lines that break the cart invariants: zero quantity, a repeated identity, or a total
/// that no longer fits in a `u64`.
fn sanitize(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::new();
    let mut total = 0u64;
    let before = lines.len();
    let kept: Vec<CartLineItem> = lines
        .into_iter()
        .filter(|line| {
            let Some(next) = line
                .checked_line_total()
                .and_then(|line_total| total.checked_add(line_total))
            else {
                return false;
            };
            let keep = line.quantity() >= 1 && seen.insert(line.id());
            if keep {
                total = next;
            }
            keep
        })
        .collect();
    if kept.len() != before {
        warn!(dropped = before - kept.len(), "Dropped invalid stored cart lines");
    }
    kept
}

impl Cart {
    fn add_product(&mut self, line: ProductLine) -> Result<LineId, CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let id = LineId::from(&line.product.id);
        match self.position(&id) {
            Some(index) => {
                let quantity = self.lines[index]
                    .quantity()
                    .checked_add(line.quantity)
                    .ok_or_else(|| {
                        CartError::InvalidQuantity(
                            i64::from(self.lines[index].quantity()) + i64::from(line.quantity),
                        )
                    })?;
                self.ensure_total_fits(Some(index), line.product.price, quantity)?;
                self.lines[index].set_quantity(quantity);
            }
            None => {
                self.ensure_total_fits(None, line.product.price, line.quantity)?;
                self.lines.push(CartLineItem::Product(line));
            }
        }
        Ok(id)
    }

    fn add_custom_build(&mut self, line: CustomBuildLine) -> Result<LineId, CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let id = line.id.clone();
        let index = self.position(&id);
        self.ensure_total_fits(index, line.price, line.quantity)?;
        match index {
            Some(index) => self.lines[index] = CartLineItem::CustomBuild(line),
            None => self.lines.push(CartLineItem::CustomBuild(line)),
        }
        Ok(id)
    }

    /// Zero or below is a removal, so an unknown line is then a no-op like `remove_line`.
    fn update_quantity(&mut self, id: &LineId, quantity: i64) -> Result<Option<u32>, CartError> {
        if quantity <= 0 {
            self.remove_line(id);
            return Ok(None);
        }
        let index = self
            .position(id)
            .ok_or_else(|| CartError::LineNotFound(id.clone()))?;
        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        self.ensure_total_fits(Some(index), self.lines[index].unit_price(), quantity)?;
        self.lines[index].set_quantity(quantity);
        Ok(Some(quantity))
    }

    /// Rejects a quantity whose line total, or the cart total with it, overflows a `u64`.
    /// `replacing` is the line the new one takes the place of, if any.
    fn ensure_total_fits(
        &self,
        replacing: Option<usize>,
        unit_price: u64,
        quantity: u32,
    ) -> Result<(), CartError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .try_fold(0u64, |total, (_, line)| {
                total.checked_add(line.checked_line_total()?)
            });
        let fits = unit_price
            .checked_mul(u64::from(quantity))
            .zip(others)
            .and_then(|(line_total, others)| others.checked_add(line_total))
            .is_some();
        if fits {
            Ok(())
        } else {
            warn!(cart_id = %self.id, unit_price, quantity, "Cart total would overflow");
            Err(CartError::InvalidQuantity(i64::from(quantity)))
        }
    }

    fn remove_line(&mut self, id: &LineId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Update = Infallible;
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = CartStorage;
    type Error = CartError;

    fn assign_id(seq: u32, _params: &CartCreate) -> CartId {
        CartId(seq)
    }

    fn from_create_params(id: CartId, _params: CartCreate) -> Result<Self, CartError> {
        Ok(Cart::new(id))
    }

    /// Rehydrates the lines from storage.
    async fn on_create(&mut self, storage: &CartStorage) -> Result<(), CartError> {
        self.lines = storage.load().await;
        info!(
            cart_id = %self.id,
            lines = self.lines.len(),
            total = self.total_price(),
            "Cart restored"
        );
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _storage: &CartStorage) -> Result<(), CartError> {
        match update {}
    }

    /// # Actions
    /// - `AddProduct`: merge by product id, else append; zero quantity is rejected
    /// - `AddCustomBuild`: append, or replace the line with the same id
    /// - `UpdateQuantity`: overwrite; zero or below removes
    /// - `RemoveLine`: remove by identity; unknown ids are ignored
    /// - `Clear`: drop every line
    async fn handle_action(
        &mut self,
        action: CartAction,
        storage: &CartStorage,
    ) -> Result<CartActionResult, CartError> {
        let result = match action {
            CartAction::AddProduct { product, quantity } => {
                CartActionResult::AddProduct(self.add_product(ProductLine { product, quantity })?)
            }
            CartAction::AddCustomBuild(line) => {
                CartActionResult::AddCustomBuild(self.add_custom_build(line)?)
            }
            CartAction::UpdateQuantity { line_id, quantity } => {
                CartActionResult::UpdateQuantity(self.update_quantity(&line_id, quantity)?)
            }
            CartAction::RemoveLine(line_id) => {
                let removed = self.remove_line(&line_id);
                if !removed {
                    debug!(cart_id = %self.id, %line_id, "Nothing to remove");
                    return Ok(CartActionResult::RemoveLine(false));
                }
                CartActionResult::RemoveLine(true)
            }
            CartAction::Clear => {
                let dropped = self.lines.len();
                self.lines.clear();
                CartActionResult::Clear(dropped)
            }
        };
        storage.save(&self.lines).await;
        debug!(
            cart_id = %self.id,
            items = self.item_count(),
            total = self.total_price(),
            "Cart changed"
        );
        Ok(result)
    }
}

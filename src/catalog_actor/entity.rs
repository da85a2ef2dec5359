//! ActorEntity implementation for [`CatalogProduct`].
//!
//! Ids are chosen by whoever seeds the catalog; a second product with the same id is
//! rejected by the runtime.

use super::actions::{CatalogAction, CatalogActionResult};
use super::error::CatalogError;
use crate::model::{CatalogProduct, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use storefront_actor::ActorEntity;

fn invalid(id: &ProductId, reason: &str) -> CatalogError {
    CatalogError::InvalidProduct {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ActorEntity for CatalogProduct {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = CatalogAction;
    type ActionResult = CatalogActionResult;
    type Context = ();
    type Error = CatalogError;

    fn assign_id(_seq: u32, params: &ProductCreate) -> ProductId {
        params.id.clone()
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, CatalogError> {
        if params.name.trim().is_empty() {
            return Err(invalid(&id, "name is empty"));
        }
        if params.price == 0 {
            return Err(invalid(&id, "price is zero"));
        }
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            original_price: params.original_price,
            stock: params.stock,
            image_urls: params.image_urls,
            category: params.category,
            brand: params.brand,
            tags: params.tags,
        })
    }

    fn mutates(action: &CatalogAction) -> bool {
        !matches!(action, CatalogAction::CheckStock)
    }

    /// Handles updates to the product.
    ///
    /// # Fields Updated
    /// - `price`: must stay above zero
    /// - `original_price`: list price shown struck through
    /// - `stock`: units the backend reports as available
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), CatalogError> {
        if update.price == Some(0) {
            return Err(invalid(&self.id, "price is zero"));
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(original) = update.original_price {
            self.original_price = Some(original);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CatalogAction,
        _ctx: &(),
    ) -> Result<CatalogActionResult, CatalogError> {
        match action {
            CatalogAction::CheckStock => Ok(CatalogActionResult::CheckStock(self.stock)),
        }
    }
}

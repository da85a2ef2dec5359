//! # Cart Client
//!
//! A handle to one open cart. Mutations become [`CartAction`]s; reads fetch the current
//! cart and compute from it, so totals are never stale.
use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::model::{Cart, CartCreate, CartId, CartLineItem, CatalogProduct, CustomBuildLine, LineId};
use async_trait::async_trait;
use storefront_actor::{ActorClient, FrameworkError, ResourceClient, ResourceEvent};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// Client for the session cart.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    id: CartId,
}

impl CartClient {
    /// Creates a cart on the actor, restoring whatever its storage holds.
    #[instrument(skip(inner))]
    pub async fn open(inner: ResourceClient<Cart>) -> Result<Self, CartError> {
        let id = inner.create(CartCreate).await.map_err(Self::map_error)?;
        info!(cart_id = %id, "Cart opened");
        Ok(Self { inner, id })
    }

    /// Binds to a cart that already exists on the actor.
    pub fn attach(inner: ResourceClient<Cart>, id: CartId) -> Self {
        Self { inner, id }
    }

    pub fn id(&self) -> CartId {
        self.id
    }

    /// Change notifications for every cart on this actor.
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceEvent<Cart>> {
        self.inner.subscribe()
    }

    async fn act(&self, action: CartAction) -> Result<CartActionResult, CartError> {
        self.inner
            .perform_action(self.id, action)
            .await
            .map_err(Self::map_error)
    }

    fn unexpected(result: CartActionResult) -> CartError {
        CartError::UnexpectedResult(format!("{result:?}"))
    }

    /// Current state of the cart.
    #[instrument(skip(self), fields(cart_id = %self.id))]
    pub async fn snapshot(&self) -> Result<Cart, CartError> {
        ActorClient::get(self, self.id)
            .await?
            .ok_or_else(|| CartError::NotFound(self.id.to_string()))
    }

    pub async fn lines(&self) -> Result<Vec<CartLineItem>, CartError> {
        Ok(self.snapshot().await?.lines)
    }

    /// Σ quantity.
    pub async fn item_count(&self) -> Result<u64, CartError> {
        Ok(self.snapshot().await?.item_count())
    }

    /// Σ price × quantity.
    pub async fn total_price(&self) -> Result<u64, CartError> {
        Ok(self.snapshot().await?.total_price())
    }

    #[instrument(skip(self, product), fields(cart_id = %self.id, product_id = %product.id))]
    pub async fn add_product(
        &self,
        product: CatalogProduct,
        quantity: u32,
    ) -> Result<LineId, CartError> {
        debug!(quantity, "Adding product");
        match self.act(CartAction::AddProduct { product, quantity }).await? {
            CartActionResult::AddProduct(id) => Ok(id),
            other => Err(Self::unexpected(other)),
        }
    }

    #[instrument(skip(self, line), fields(cart_id = %self.id, line_id = %line.id))]
    pub async fn add_custom_build(&self, line: CustomBuildLine) -> Result<LineId, CartError> {
        debug!(price = line.price, "Adding custom build");
        match self.act(CartAction::AddCustomBuild(line)).await? {
            CartActionResult::AddCustomBuild(id) => Ok(id),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Returns the new quantity, or `None` if the line was removed.
    #[instrument(skip(self), fields(cart_id = %self.id))]
    pub async fn update_quantity(
        &self,
        line_id: LineId,
        quantity: i64,
    ) -> Result<Option<u32>, CartError> {
        match self
            .act(CartAction::UpdateQuantity { line_id, quantity })
            .await?
        {
            CartActionResult::UpdateQuantity(quantity) => Ok(quantity),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Returns whether a line was removed.
    #[instrument(skip(self), fields(cart_id = %self.id))]
    pub async fn remove_line(&self, line_id: LineId) -> Result<bool, CartError> {
        match self.act(CartAction::RemoveLine(line_id)).await? {
            CartActionResult::RemoveLine(removed) => Ok(removed),
            other => Err(Self::unexpected(other)),
        }
    }

    #[instrument(skip(self), fields(cart_id = %self.id))]
    pub async fn clear(&self) -> Result<usize, CartError> {
        match self.act(CartAction::Clear).await? {
            CartActionResult::Clear(dropped) => Ok(dropped),
            other => Err(Self::unexpected(other)),
        }
    }
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> CartError {
        match e {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            other => other
                .downcast_entity::<CartError>()
                .unwrap_or_else(|e| CartError::ActorCommunicationError(e.to_string())),
        }
    }
}

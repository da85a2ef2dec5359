//! # Catalog Client
//!
//! The [`CatalogSource`] trait is how the rest of the storefront reads products. The
//! in-process implementation, [`CatalogClient`], wraps a `ResourceClient<CatalogProduct>`.
use crate::catalog_actor::{CatalogAction, CatalogActionResult, CatalogError};
use crate::model::{CatalogProduct, ProductCreate, ProductFilter, ProductId, ProductPage, ProductUpdate};
use async_trait::async_trait;
use storefront_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Read-only product lookup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Products matching `filter`, paged by its `offset`/`limit`.
    async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, CatalogError>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<CatalogProduct>, CatalogError>;
}

/// Client for interacting with the Catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<CatalogProduct>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<CatalogProduct>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(product_id = %params.id))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, CatalogError> {
        debug!(?params, "Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<CatalogProduct, CatalogError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Units currently in stock.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, CatalogError> {
        debug!("Checking stock");
        match self
            .inner
            .perform_action(id, CatalogAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            CatalogActionResult::CheckStock(level) => Ok(level),
        }
    }
}

#[async_trait]
impl ActorClient<CatalogProduct> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<CatalogProduct> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> CatalogError {
        match e {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            FrameworkError::AlreadyExists(id) => CatalogError::InvalidProduct {
                id,
                reason: "already in the catalog".to_string(),
            },
            other => other
                .downcast_entity::<CatalogError>()
                .unwrap_or_else(|e| CatalogError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, CatalogError> {
        let matching: Vec<CatalogProduct> = ActorClient::list(self)
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        let total = matching.len();
        let products = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        debug!(total, "Listed products");
        Ok(ProductPage { products, total })
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<CatalogProduct>, CatalogError> {
        ActorClient::get(self, id.clone()).await
    }
}

//! # ActorClient Trait
//!
//! Shared read/delete surface for the domain clients (`CatalogClient`, `CartClient`,
//! `OrderClient`), built on the generic [`ResourceClient`].
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// Implementors only say where the inner client is and how framework failures become their
/// own error type; `get`, `list` and `delete` come for free.
///
/// # Example
///
/// ```rust
/// use storefront_actor::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Banner { slot: String }
/// #[derive(Debug)] struct BannerCreate { slot: String }
/// #[derive(Debug)] struct BannerUpdate;
/// #[derive(Debug)] enum BannerAction {}
/// #[derive(Debug, thiserror::Error)] #[error("banner: {0}")] struct BannerError(String);
///
/// #[async_trait]
/// impl ActorEntity for Banner {
///     type Id = String;
///     type Create = BannerCreate;
///     type Update = BannerUpdate;
///     type Action = BannerAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = BannerError;
///
///     fn assign_id(_: u32, params: &BannerCreate) -> String { params.slot.clone() }
///     fn from_create_params(slot: String, _: BannerCreate) -> Result<Self, BannerError> {
///         Ok(Self { slot })
///     }
///     async fn on_update(&mut self, _: BannerUpdate, _: &()) -> Result<(), BannerError> { Ok(()) }
///     async fn handle_action(&mut self, _: BannerAction, _: &()) -> Result<(), BannerError> { Ok(()) }
/// }
///
/// struct BannerClient { inner: ResourceClient<Banner> }
///
/// #[async_trait]
/// impl ActorClient<Banner> for BannerClient {
///     type Error = BannerError;
///
///     fn inner(&self) -> &ResourceClient<Banner> { &self.inner }
///
///     fn map_error(e: FrameworkError) -> BannerError { BannerError(e.to_string()) }
/// }
///
/// async fn usage(client: BannerClient) {
///     let _ = client.get("home-hero".to_string()).await;
///     let _ = client.list().await;
///     let _ = client.delete("home-hero".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a resource by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Every stored resource in creation order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete a resource by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

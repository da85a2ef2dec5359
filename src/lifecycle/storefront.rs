use crate::backend::{HttpOrderBackend, OrderBackend, SubmissionError};
use crate::cart_actor::{self, CartError, CartStorage};
use crate::catalog_actor;
use crate::checkout::{CheckoutOrchestrator, OrderSubmissionAdapter};
use crate::clients::{CartClient, CatalogClient, OrderClient};
use crate::config::StorefrontConfig;
use crate::configurator::{advisor_from_config, Advisor, BuildConfigurator, BuildError};
use crate::order_actor;
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Cart could not be opened: {0}")]
    Cart(#[from] CartError),

    #[error("Order backend could not be set up: {0}")]
    Backend(#[from] SubmissionError),

    #[error("Actor task failed: {0}")]
    Task(String),
}

/// The running storefront for one session.
///
/// `Storefront` is responsible for:
/// - **Lifecycle Management**: starting and stopping the catalog, cart and order actors
/// - **Dependency Wiring**: the order actor gets a catalog client, the cart actor its storage
/// - **Session State**: opening (and so rehydrating) the session cart
///
/// # Example
///
/// ```ignore
/// let storefront = Storefront::start(StorefrontConfig::load()?).await?;
///
/// storefront.cart.add_product(cpu, 1).await?;
/// storefront.checkout.submit(&draft).await?;
///
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    pub catalog: CatalogClient,
    pub cart: CartClient,
    /// Present when orders are kept in process rather than sent to a REST API.
    pub orders: Option<OrderClient>,
    pub checkout: CheckoutOrchestrator,
    advisor: Arc<dyn Advisor>,
    config: StorefrontConfig,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Starts with file storage under the configured data directory and the advisor the
    /// configuration describes.
    pub async fn start(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let store = Arc::new(FileStore::new(&config.storage.data_dir));
        let advisor = advisor_from_config(&config.advisory);
        Self::start_with(config, store, advisor).await
    }

    /// Starts with an explicit store and advisor.
    pub async fn start_with(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        advisor: Arc<dyn Advisor>,
    ) -> Result<Self, StorefrontError> {
        // 1. Create actors (no dependencies yet)
        let (catalog_actor, catalog_client) = catalog_actor::new();
        let (cart_actor, cart_client) = cart_actor::new();
        let catalog = CatalogClient::new(catalog_client);

        // 2. Start actors with their context injected
        let mut handles = vec![
            tokio::spawn(catalog_actor.run(())),
            tokio::spawn(cart_actor.run(CartStorage::new(store, config.storage.cart_key.clone()))),
        ];

        let (backend, orders): (Arc<dyn OrderBackend>, Option<OrderClient>) =
            match config.backend.order_api_url.as_deref() {
                Some(url) => {
                    info!(url, "Orders go to the REST backend");
                    (Arc::new(HttpOrderBackend::new(url)?), None)
                }
                None => {
                    let (order_actor, order_client) = order_actor::new();
                    handles.push(tokio::spawn(order_actor.run(catalog.clone())));
                    let orders = OrderClient::new(order_client);
                    (Arc::new(orders.clone()), Some(orders))
                }
            };

        // 3. Open the session cart; this is where stored lines come back
        let cart = CartClient::open(cart_client).await?;

        let checkout = CheckoutOrchestrator::new(
            cart.clone(),
            OrderSubmissionAdapter::new(backend),
            config.payment.clone(),
        );

        info!(cart_id = %cart.id(), "Storefront started");
        Ok(Self {
            catalog,
            cart,
            orders,
            checkout,
            advisor,
            config,
            handles,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// A fresh build configurator over the current catalog.
    pub async fn configurator(&self) -> Result<BuildConfigurator, BuildError> {
        BuildConfigurator::from_catalog(
            &self.catalog,
            self.advisor.clone(),
            self.config.advisory.timeout(),
        )
        .await
    }

    /// Gracefully shuts down every actor.
    ///
    /// Dropping the clients closes the mailboxes. The order actor holds a catalog client, so
    /// the catalog actor stops only after the order actor has.
    pub async fn shutdown(self) -> Result<(), StorefrontError> {
        info!("Shutting down storefront...");

        drop(self.checkout);
        drop(self.cart);
        drop(self.orders);
        drop(self.catalog);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(StorefrontError::Task(e.to_string()));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

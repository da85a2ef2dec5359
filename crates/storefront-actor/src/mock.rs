//! # Mocking Actors in Tests
//!
//! Two ways to stand in for a real actor:
//!
//! * [`MockClient`] queues scripted replies. Good for testing code that *uses* a client, such
//!   as the order actor validating product lines against a stubbed catalog.
//! * [`create_mock_client`] hands back the raw mailbox receiver so the test can inspect each
//!   request (e.g. that `add_product` sent `AddProduct { quantity: 2 }`) and answer by hand.
//!
//! | | `MockClient` | Real actor |
//! |---|---|---|
//! | State | none, scripted replies | real store |
//! | Error injection | `return_err` | needs a failing state |
//! | Use | code around the client | the entity itself, end to end |
//!
//! ```rust
//! use storefront_actor::mock::MockClient;
//! use storefront_actor::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Shipment { code: String }
//! #[derive(Debug)] struct ShipmentCreate;
//! #[derive(Debug)] struct ShipmentUpdate;
//! #[derive(Debug)] enum ShipmentAction {}
//! #[derive(Debug, thiserror::Error)] #[error("shipment")] struct ShipmentError;
//!
//! #[async_trait]
//! impl ActorEntity for Shipment {
//!     type Id = String; type Create = ShipmentCreate; type Update = ShipmentUpdate;
//!     type Action = ShipmentAction; type ActionResult = (); type Context = (); type Error = ShipmentError;
//!     fn assign_id(seq: u32, _: &ShipmentCreate) -> String { format!("ship_{seq}") }
//!     fn from_create_params(code: String, _: ShipmentCreate) -> Result<Self, ShipmentError> { Ok(Self { code }) }
//!     async fn on_update(&mut self, _: ShipmentUpdate, _: &()) -> Result<(), ShipmentError> { Ok(()) }
//!     async fn handle_action(&mut self, _: ShipmentAction, _: &()) -> Result<(), ShipmentError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Shipment>::new();
//!     mock.expect_get("ship_1".to_string()).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get("ship_1".to_string()).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceEvent, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc, oneshot};

/// A scripted reply waiting for its request.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Get { id, .. } => format!("get({id})"),
            Expectation::List { .. } => "list()".to_string(),
            Expectation::Create { .. } => "create(..)".to_string(),
            Expectation::Action { id, .. } => format!("action({id}, ..)"),
        }
    }
}

struct MockState<T: ActorEntity> {
    pending: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type Shared<T> = Arc<Mutex<MockState<T>>>;

fn lock<T: ActorEntity>(state: &Shared<T>) -> MutexGuard<'_, MockState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { .. } => "create(..)".to_string(),
        ResourceRequest::Get { id, .. } => format!("get({id})"),
        ResourceRequest::List { .. } => "list()".to_string(),
        ResourceRequest::Update { id, .. } => format!("update({id}, ..)"),
        ResourceRequest::Delete { id, .. } => format!("delete({id})"),
        ResourceRequest::Action { id, .. } => format!("action({id}, ..)"),
    }
}

/// A mock client that answers requests from a queue of expectations, in order.
///
/// A request that does not match the next expectation (wrong kind or wrong id) is recorded
/// and its response channel dropped, so the caller sees [`FrameworkError::ActorDropped`] and
/// [`MockClient::verify`] reports the mismatch.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let (events, _) = broadcast::channel::<ResourceEvent<T>>(16);
        let state: Shared<T> = Arc::new(Mutex::new(MockState {
            pending: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let worker_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&worker_state).pending.pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        let message = format!(
                            "received {} but expected {}",
                            describe_request(&request),
                            expectation.map_or_else(|| "nothing".to_string(), |e| e.describe())
                        );
                        // Record before the reply channel closes so `verify` sees it.
                        lock(&worker_state).mismatches.push(message);
                        drop(request);
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender, events),
            state,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        lock(&self.state).pending.push_back(expectation);
    }

    /// Expects a `get` for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<'_, T> {
        GetExpectationBuilder { mock: self, id }
    }

    /// Expects a `list`.
    pub fn expect_list(&mut self) -> ListExpectationBuilder<'_, T> {
        ListExpectationBuilder { mock: self }
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder<'_, T> {
        CreateExpectationBuilder { mock: self }
    }

    /// Expects an action against `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<'_, T> {
        ActionExpectationBuilder { mock: self, id }
    }

    /// Panics if an expectation was not consumed or a request did not match.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.mismatches.is_empty() {
            panic!("Unexpected requests: {}", state.mismatches.join("; "));
        }
        if !state.pending.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.pending.len()
            );
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> GetExpectationBuilder<'_, T> {
    pub fn return_ok(self, value: Option<T>) {
        self.mock.push(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `list` expectations.
pub struct ListExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
}

impl<T: ActorEntity> ListExpectationBuilder<'_, T> {
    pub fn return_ok(self, items: Vec<T>) {
        self.mock.push(Expectation::List { response: Ok(items) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::List {
            response: Err(error),
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
}

impl<T: ActorEntity> CreateExpectationBuilder<'_, T> {
    pub fn return_ok(self, id: T::Id) {
        self.mock.push(Expectation::Create { response: Ok(id) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Create {
            response: Err(error),
        });
    }
}

/// Builder for action expectations.
pub struct ActionExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> ActionExpectationBuilder<'_, T> {
    pub fn return_ok(self, result: T::ActionResult) {
        self.mock.push(Expectation::Action {
            id: self.id,
            response: Ok(result),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Action {
            id: self.id,
            response: Err(error),
        });
    }
}

// =============================================================================
// RAW MAILBOX HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver owned by the test.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(16);
    (ResourceClient::new(sender, events), receiver)
}

/// Next request, if it is a `create`.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a `get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Coupon {
        code: String,
        percent_off: u8,
    }

    #[derive(Debug)]
    struct CouponCreate {
        code: String,
    }

    #[derive(Debug)]
    struct CouponUpdate;

    #[derive(Debug)]
    enum CouponAction {
        Redeem,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("coupon error")]
    struct CouponError;

    #[async_trait]
    impl ActorEntity for Coupon {
        type Id = String;
        type Create = CouponCreate;
        type Update = CouponUpdate;
        type Action = CouponAction;
        type ActionResult = bool;
        type Context = ();
        type Error = CouponError;

        fn assign_id(_seq: u32, params: &CouponCreate) -> String {
            params.code.clone()
        }

        fn from_create_params(code: String, _: CouponCreate) -> Result<Self, CouponError> {
            Ok(Self {
                code,
                percent_off: 10,
            })
        }

        async fn on_update(&mut self, _: CouponUpdate, _: &()) -> Result<(), CouponError> {
            Ok(())
        }

        async fn handle_action(&mut self, _: CouponAction, _: &()) -> Result<bool, CouponError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_raw_mailbox_create() {
        let (client, mut receiver) = create_mock_client::<Coupon>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(CouponCreate {
                    code: "TET2025".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.code, "TET2025");
        responder.send(Ok("TET2025".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), "TET2025");
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_create().return_ok("TET2025".to_string());
        mock.expect_get("TET2025".to_string()).return_ok(Some(Coupon {
            code: "TET2025".to_string(),
            percent_off: 10,
        }));
        mock.expect_action("TET2025".to_string()).return_ok(true);
        mock.expect_list().return_ok(vec![]);

        let client = mock.client();
        let id = client
            .create(CouponCreate {
                code: "TET2025".to_string(),
            })
            .await
            .unwrap();
        let coupon = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(coupon.percent_off, 10);
        assert!(client.perform_action(id, CouponAction::Redeem).await.unwrap());
        assert!(client.list().await.unwrap().is_empty());

        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_is_reported() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_get("TET2025".to_string()).return_ok(None);

        let result = mock.client().get("BLACKFRIDAY".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));

        let verified = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verified.is_err());
    }
}

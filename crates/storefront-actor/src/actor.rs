//! # Resource Actor
//!
//! The server half of every storefront actor: owns the resources, drains the mailbox one
//! request at a time, and broadcasts changes.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceEvent, ResourceRequest};
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Capacity of the change-notification channel. Slow subscribers observe `Lagged`.
const EVENT_CAPACITY: usize = 64;

/// The generic actor that manages a collection of resources.
///
/// Requests are processed strictly in arrival order, so two cart mutations issued one after
/// the other are applied in that order and no lock guards the store. Each actor runs in its
/// own Tokio task.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and a cloneable client.
/// 2. **Wire**: pass dependencies into `actor.run(context)`.
/// 3. **Run**: spawn the returned future.
///
/// ```rust
/// use storefront_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Voucher { code: String, uses: u32 }
/// #[derive(Debug)] struct VoucherCreate { code: String }
/// #[derive(Debug)] struct VoucherUpdate;
/// #[derive(Debug)] enum VoucherAction { Redeem }
/// #[derive(Debug, thiserror::Error)] #[error("voucher error")] struct VoucherError;
///
/// #[async_trait]
/// impl ActorEntity for Voucher {
///     type Id = String;
///     type Create = VoucherCreate;
///     type Update = VoucherUpdate;
///     type Action = VoucherAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = VoucherError;
///
///     fn assign_id(_seq: u32, params: &VoucherCreate) -> String { params.code.clone() }
///     fn from_create_params(code: String, _: VoucherCreate) -> Result<Self, VoucherError> {
///         Ok(Self { code, uses: 0 })
///     }
///     async fn on_update(&mut self, _: VoucherUpdate, _: &()) -> Result<(), VoucherError> { Ok(()) }
///     async fn handle_action(&mut self, _: VoucherAction, _: &()) -> Result<u32, VoucherError> {
///         self.uses += 1;
///         Ok(self.uses)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Voucher>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(VoucherCreate { code: "GIAM10".into() }).await.unwrap();
///     assert_eq!(client.perform_action(id, VoucherAction::Redeem).await.unwrap(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: asks [`ActorEntity::assign_id`] for the id, rejects duplicates with
///   [`FrameworkError::AlreadyExists`], builds the resource, runs `on_create`, stores it.
/// * **Get** / **List**: clones out of the store. `List` keeps creation order.
/// * **Update**: runs `on_update` against the stored resource and returns the new state.
/// * **Delete**: runs `on_delete`, then removes.
/// * **Action**: runs `handle_action`; mutating actions broadcast `Updated` on success.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    events: broadcast::Sender<ResourceEvent<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_seq: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` bounds the mailbox; callers wait for space when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let actor = Self {
            receiver,
            events: events.clone(),
            store: HashMap::new(),
            order: Vec::new(),
            next_seq: 1,
        };
        let client = ResourceClient::new(sender, events);
        (actor, client)
    }

    fn publish(&self, event: ResourceEvent<T>) {
        // No subscribers is the common case.
        let _ = self.events.send(event);
    }

    /// Runs the event loop until every client has been dropped.
    ///
    /// `context` is injected into every hook.
    pub async fn run(mut self, context: T::Context) {
        // e.g. "Cart" instead of "pc_storefront::model::cart::Cart"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::assign_id(self.next_seq, &params);
                    self.next_seq += 1;

                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.publish(ResourceEvent::Created(item.clone()));
                            self.store.insert(id.clone(), item);
                            self.order.push(id.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let items: Vec<T> = self
                        .order
                        .iter()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let updated = item.clone();
                    info!(entity_type, %id, "Updated");
                    self.publish(ResourceEvent::Updated(updated.clone()));
                    let _ = respond_to.send(Ok(updated));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    self.order.retain(|existing| existing != &id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    self.publish(ResourceEvent::Deleted(id));
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mutates = T::mutates(&action);
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => {
                            info!(entity_type, %id, "Action ok");
                            if mutates {
                                let snapshot = item.clone();
                                self.publish(ResourceEvent::Updated(snapshot));
                            }
                        }
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

//! # ActorEntity Trait
//!
//! The contract every storefront resource (catalog products, session carts, submitted orders)
//! implements so a single generic [`ResourceActor`](crate::ResourceActor) can own it.
//!
//! Associated types pin each resource to its own id, payloads, actions and error. A cart
//! actor only accepts `CartAction`s; a catalog actor only accepts product payloads. The
//! compiler rejects everything else.
//!
//! # Identity
//! Resources do not all mint their ids the same way. Orders and carts take a sequence number
//! from the actor, catalog products arrive with the id the backend already gave them. The
//! [`ActorEntity::assign_id`] hook decides.
//!
//! # Hooks
//! [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any storefront resource implements to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may await other actors or storage. The `Context` type
/// is handed to `run()` and injected into every hook, which lets the runtime wire the cart
/// actor to its storage and the order actor to the catalog after both were constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this resource.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Creation payload.
    type Create: Send + Sync + Debug;

    /// Update payload.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `AddProduct`, `CheckStock`).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()` time. Use `()` when there are none.
    type Context: Send + Sync;

    /// One error enum per resource, shared by every hook and action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Chooses the id for a resource about to be created.
    ///
    /// `seq` starts at 1 and increments on every create request, whether or not the
    /// resource ends up stored.
    fn assign_id(seq: u32, params: &Self::Create) -> Self::Id;

    /// Construct the full resource from its id and payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether an action changes state. Read-only actions are not broadcast to subscribers.
    fn mutates(_action: &Self::Action) -> bool {
        true
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the resource is stored.
    /// Failing here aborts the create.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the resource is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

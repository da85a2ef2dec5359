//! # Messages
//!
//! Request and event types exchanged between a [`ResourceClient`](crate::ResourceClient) and
//! its [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to the actor's mailbox.
///
/// Every resource gets the same lifecycle surface (create, get, list, update, delete) plus
/// an `Action` variant for resource-specific operations such as adding a line to a cart.
/// The payload types come from the resource's [`ActorEntity`] implementation, so a cart
/// payload can never reach the catalog actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// All stored resources, in creation order.
    List { respond_to: Response<Vec<T>> },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete { id: T::Id, respond_to: Response<()> },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// Change notification published by an actor after a successful mutation.
///
/// Components that need to react to cart or catalog changes subscribe through
/// [`ResourceClient::subscribe`](crate::ResourceClient::subscribe) instead of listening on a
/// process-wide event bus.
#[derive(Debug, Clone)]
pub enum ResourceEvent<T: ActorEntity> {
    Created(T),
    Updated(T),
    Deleted(T::Id),
}

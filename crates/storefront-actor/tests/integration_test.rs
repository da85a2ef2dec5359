use async_trait::async_trait;
use storefront_actor::{ActorEntity, FrameworkError, ResourceActor, ResourceEvent};
use tokio::sync::broadcast::error::TryRecvError;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Shelf {
    code: String,
    label: String,
    units: u32,
}

#[derive(Debug)]
struct ShelfCreate {
    code: Option<String>,
    label: String,
}

#[derive(Debug)]
struct ShelfUpdate {
    label: Option<String>,
}

#[derive(Debug)]
enum ShelfAction {
    Stock(u32),
    Count,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum ShelfError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("cannot stock zero units")]
    ZeroUnits,
}

#[async_trait]
impl ActorEntity for Shelf {
    type Id = String;
    type Create = ShelfCreate;
    type Update = ShelfUpdate;
    type Action = ShelfAction;
    type ActionResult = u32;
    type Context = ();
    type Error = ShelfError;

    fn assign_id(seq: u32, params: &ShelfCreate) -> String {
        params.code.clone().unwrap_or_else(|| format!("shelf_{seq}"))
    }

    fn from_create_params(code: String, params: ShelfCreate) -> Result<Self, ShelfError> {
        if params.label.trim().is_empty() {
            return Err(ShelfError::EmptyLabel);
        }
        Ok(Self {
            code,
            label: params.label,
            units: 0,
        })
    }

    fn mutates(action: &ShelfAction) -> bool {
        !matches!(action, ShelfAction::Count)
    }

    async fn on_update(&mut self, update: ShelfUpdate, _ctx: &()) -> Result<(), ShelfError> {
        if let Some(label) = update.label {
            self.label = label;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: ShelfAction, _ctx: &()) -> Result<u32, ShelfError> {
        match action {
            ShelfAction::Stock(0) => Err(ShelfError::ZeroUnits),
            ShelfAction::Stock(units) => {
                self.units += units;
                Ok(self.units)
            }
            ShelfAction::Count => Ok(self.units),
        }
    }
}

fn shelf(code: Option<&str>, label: &str) -> ShelfCreate {
    ShelfCreate {
        code: code.map(str::to_string),
        label: label.to_string(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_full_lifecycle() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(shelf(None, "GPUs")).await.unwrap();
    assert_eq!(id, "shelf_1");

    assert_eq!(
        client
            .perform_action(id.clone(), ShelfAction::Stock(4))
            .await
            .unwrap(),
        4
    );

    let updated = client
        .update(
            id.clone(),
            ShelfUpdate {
                label: Some("Graphics cards".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.label, "Graphics cards");
    assert_eq!(updated.units, 4);

    client.delete(id.clone()).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_caller_assigned_ids_reject_duplicates() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    client.create(shelf(Some("CPU"), "Processors")).await.unwrap();
    let duplicate = client.create(shelf(Some("CPU"), "Again")).await;
    assert!(matches!(duplicate, Err(FrameworkError::AlreadyExists(id)) if id == "CPU"));

    let stored = client.get("CPU".to_string()).await.unwrap().unwrap();
    assert_eq!(stored.label, "Processors");
}

#[tokio::test]
async fn test_list_keeps_creation_order() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    for code in ["RAM", "CPU", "SSD"] {
        client.create(shelf(Some(code), code)).await.unwrap();
    }
    client.delete("CPU".to_string()).await.unwrap();

    let codes: Vec<String> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.code)
        .collect();
    assert_eq!(codes, vec!["RAM", "SSD"]);
}

#[tokio::test]
async fn test_entity_errors_are_typed() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(shelf(None, "   ")).await.unwrap_err();
    assert_eq!(err.downcast_entity::<ShelfError>().unwrap(), ShelfError::EmptyLabel);

    let id = client.create(shelf(None, "PSUs")).await.unwrap();
    let err = client
        .perform_action(id, ShelfAction::Stock(0))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_entity::<ShelfError>().unwrap(), ShelfError::ZeroUnits);

    let missing = client
        .perform_action("nope".to_string(), ShelfAction::Count)
        .await;
    assert!(matches!(missing, Err(FrameworkError::NotFound(_))));
}

#[tokio::test]
async fn test_subscribers_see_mutations_only() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    let mut events = client.subscribe();
    tokio::spawn(actor.run(()));

    let id = client.create(shelf(Some("CASE"), "Cases")).await.unwrap();
    client
        .perform_action(id.clone(), ShelfAction::Count)
        .await
        .unwrap();
    client
        .perform_action(id.clone(), ShelfAction::Stock(2))
        .await
        .unwrap();
    client.delete(id).await.unwrap();

    assert!(matches!(events.recv().await.unwrap(), ResourceEvent::Created(s) if s.code == "CASE"));
    assert!(matches!(events.recv().await.unwrap(), ResourceEvent::Updated(s) if s.units == 2));
    assert!(matches!(events.recv().await.unwrap(), ResourceEvent::Deleted(code) if code == "CASE"));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_actor_stops_when_clients_drop() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    let handle = tokio::spawn(actor.run(()));

    client.create(shelf(None, "Fans")).await.unwrap();
    drop(client);

    handle.await.unwrap();
}

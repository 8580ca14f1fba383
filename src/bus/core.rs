//! # Bus Core
//!
//! [`BusActor`] owns the routing table and processes requests sequentially, so the
//! table needs no lock. [`MixedBus`] is the cheap, cloneable handle that talks to it.

use super::BusError;
use crate::model::{CommandKind, Event, Inbound};
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

/// Type alias for the one-shot response channel used by the bus actor.
pub type Response<T> = oneshot::Sender<T>;

/// Internal message type sent to the [`BusActor`].
#[derive(Debug)]
pub enum BusRequest {
    Subscribe {
        kind: CommandKind,
        queue: mpsc::Sender<Inbound>,
        respond_to: Response<()>,
    },
    Dispatch {
        message: Inbound,
        respond_to: Response<usize>,
    },
}

/// The routing half of the bus.
///
/// Must be spawned with [`BusActor::run`]. It stops once every [`MixedBus`] handle is
/// dropped, and dropping it closes every [`Subscription`].
pub struct BusActor {
    receiver: mpsc::Receiver<BusRequest>,
    routes: HashMap<CommandKind, Vec<mpsc::Sender<Inbound>>>,
}

impl BusActor {
    /// Creates the actor and its handle.
    ///
    /// * `buffer_size` - capacity of the request channel and of each subscription queue.
    /// * `event_capacity` - how many events a slow event receiver may lag behind.
    pub fn new(buffer_size: usize, event_capacity: usize) -> (Self, MixedBus) {
        // Both channel constructors reject a zero capacity.
        let buffer_size = buffer_size.max(1);
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(event_capacity.max(1));
        let actor = Self {
            receiver,
            routes: HashMap::new(),
        };
        let bus = MixedBus {
            sender,
            publisher: Publisher { events },
            buffer_size,
        };
        (actor, bus)
    }

    pub async fn run(mut self) {
        info!("Bus started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                BusRequest::Subscribe {
                    kind,
                    queue,
                    respond_to,
                } => {
                    let handlers = self.routes.entry(kind).or_default();
                    handlers.push(queue);
                    debug!(%kind, handlers = handlers.len(), "Subscribed");
                    let _ = respond_to.send(());
                }
                BusRequest::Dispatch {
                    message,
                    respond_to,
                } => {
                    let kind = message.kind();
                    let delivered = self.deliver(message).await;
                    if delivered == 0 {
                        warn!(%kind, "No handler for command");
                    } else {
                        debug!(%kind, delivered, "Dispatched");
                    }
                    let _ = respond_to.send(delivered);
                }
            }
        }

        info!(kinds = self.routes.len(), "Bus shutdown");
    }

    /// Sends `message` to every live queue for its kind and prunes closed ones.
    async fn deliver(&mut self, message: Inbound) -> usize {
        let Some(handlers) = self.routes.get_mut(&message.kind()) else {
            return 0;
        };
        let mut open = Vec::with_capacity(handlers.len());
        for queue in handlers.drain(..) {
            if queue.send(message.clone()).await.is_ok() {
                open.push(queue);
            }
        }
        *handlers = open;
        handlers.len()
    }
}

/// Cloneable handle to a running [`BusActor`] and its event channel.
#[derive(Clone)]
pub struct MixedBus {
    sender: mpsc::Sender<BusRequest>,
    publisher: Publisher,
    buffer_size: usize,
}

impl MixedBus {
    /// Registers a new handler queue for `kind`.
    pub async fn subscribe(&self, kind: CommandKind) -> Result<Subscription, BusError> {
        let (queue, receiver) = mpsc::channel(self.buffer_size);
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BusRequest::Subscribe {
                kind,
                queue,
                respond_to,
            })
            .await
            .map_err(|_| BusError::BusClosed)?;
        response.await.map_err(|_| BusError::BusDropped)?;
        Ok(Subscription { kind, receiver })
    }

    /// Routes a command (or a pre-formed failure) to the handlers of its kind.
    ///
    /// Returns how many handlers received it.
    pub async fn dispatch(&self, message: impl Into<Inbound>) -> Result<usize, BusError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BusRequest::Dispatch {
                message: message.into(),
                respond_to,
            })
            .await
            .map_err(|_| BusError::BusClosed)?;
        response.await.map_err(|_| BusError::BusDropped)
    }

    pub fn publish(&self, event: Event) {
        self.publisher.publish(event)
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.publisher.events()
    }

    /// A publish-only handle. Holding it does not keep the routing actor alive.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }
}

/// Publish-only side of the bus.
#[derive(Clone)]
pub struct Publisher {
    events: broadcast::Sender<Event>,
}

impl Publisher {
    /// Fire-and-forget. Having no event subscribers is not an error.
    pub fn publish(&self, event: Event) {
        let kind = event.kind();
        let owner = event.owner().id.clone();
        match self.events.send(event) {
            Ok(receivers) => trace!(?kind, %owner, receivers, "Published"),
            Err(_) => trace!(?kind, %owner, "Published with no listeners"),
        }
    }

    /// Subscribes to every event published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

/// Handler queue for one [`CommandKind`].
pub struct Subscription {
    kind: CommandKind,
    receiver: mpsc::Receiver<Inbound>,
}

impl Subscription {
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Next message, or `None` once the bus has shut down.
    pub async fn recv(&mut self) -> Option<Inbound> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Command, CommandFailure, Envelope, Owner, Params};

    fn owner() -> Owner {
        Owner::rest("notes", "/api/notes")
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_kind() {
        let (actor, bus) = BusActor::new(8, 8);
        tokio::spawn(actor.run());

        let mut reads = bus.subscribe(CommandKind::Read).await.unwrap();
        let mut deletes = bus.subscribe(CommandKind::Delete).await.unwrap();

        let delivered = bus.dispatch(Command::read(owner(), Params::new())).await.unwrap();
        assert_eq!(delivered, 1);
        let delivered = bus
            .dispatch(CommandFailure::new(CommandKind::Delete, owner(), "bad"))
            .await
            .unwrap();
        assert_eq!(delivered, 1);

        assert_eq!(reads.recv().await.unwrap().kind(), CommandKind::Read);
        assert!(matches!(deletes.recv().await.unwrap(), Inbound::Failure(_)));
    }

    #[tokio::test]
    async fn test_dispatch_without_handler_reaches_nobody() {
        let (actor, bus) = BusActor::new(8, 8);
        tokio::spawn(actor.run());

        let delivered = bus.dispatch(Command::new(owner())).await.unwrap();
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_closed_subscription_is_pruned() {
        let (actor, bus) = BusActor::new(8, 8);
        tokio::spawn(actor.run());

        let kept = bus.subscribe(CommandKind::New).await.unwrap();
        let dropped = bus.subscribe(CommandKind::New).await.unwrap();
        drop(dropped);

        let delivered = bus.dispatch(Command::new(owner())).await.unwrap();
        assert_eq!(delivered, 1);
        drop(kept);
    }

    #[tokio::test]
    async fn test_dropping_bus_closes_subscriptions() {
        let (actor, bus) = BusActor::new(8, 8);
        let handle = tokio::spawn(actor.run());

        let mut subscription = bus.subscribe(CommandKind::Read).await.unwrap();
        drop(bus);
        handle.await.unwrap();

        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_publish_preserves_order() {
        let (_actor, bus) = BusActor::new(8, 8);
        let mut events = bus.events();

        bus.publish(Event::CreateDone {
            owner: owner(),
            envelope: Envelope::ok(vec![]),
        });
        bus.publish(Event::DataChanged {
            owner: owner(),
            envelope: Envelope::ok(vec![]),
        });

        assert!(matches!(events.recv().await.unwrap(), Event::CreateDone { .. }));
        assert!(matches!(events.recv().await.unwrap(), Event::DataChanged { .. }));
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_fine() {
        let (_actor, bus) = BusActor::new(8, 8);
        bus.publish(Event::DataError {
            owner: owner(),
            envelope: Envelope::empty_error(),
        });
    }
}

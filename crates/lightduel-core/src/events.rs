use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::player::{PlayerTag, Side};

/// Default capacity of the collision bus. A frame produces at most one
/// event per player, so this only matters if nobody drains for a while.
const DEFAULT_BUS_CAPACITY: usize = 64;

/// Physical identity of something a player can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderTag {
    /// A player's own moving body.
    Body(Side),
    /// A trail segment stamped by the given side.
    Trail(Side),
    /// The arena border.
    Wall,
}

/// Raised exactly once by a player when it crashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub tag: PlayerTag,
}

/// Explicit message bus for collision notifications.
///
/// Built on a broadcast channel but used synchronously: publishers call
/// `send`, subscribers drain with `try_recv` once per frame. Dropping a
/// [`CollisionSubscription`] unsubscribes it.
#[derive(Debug, Clone)]
pub struct CollisionBus {
    tx: broadcast::Sender<CollisionEvent>,
}

impl Default for CollisionBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Handle for a component that raises collision events.
    pub fn publisher(&self) -> CollisionPublisher {
        CollisionPublisher {
            tx: self.tx.clone(),
        }
    }

    /// Register a new subscriber. Only events sent after this call are seen.
    pub fn subscribe(&self) -> CollisionSubscription {
        CollisionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Sending half of the collision bus.
#[derive(Debug, Clone)]
pub struct CollisionPublisher {
    tx: broadcast::Sender<CollisionEvent>,
}

impl CollisionPublisher {
    /// Broadcast a collision. Returns the number of subscribers reached.
    pub fn publish(&self, tag: &str) -> usize {
        match self.tx.send(CollisionEvent {
            tag: tag.to_string(),
        }) {
            Ok(n) => n,
            Err(_) => {
                tracing::debug!(tag, "Collision published with no subscribers");
                0
            },
        }
    }
}

/// Receiving half of the collision bus.
#[derive(Debug)]
pub struct CollisionSubscription {
    rx: broadcast::Receiver<CollisionEvent>,
}

impl CollisionSubscription {
    /// Take every event queued since the last drain.
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!("Collision subscriber lagged by {n} events");
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }
}

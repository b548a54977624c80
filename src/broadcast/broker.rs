use dashmap::DashMap;
use futures_util::Stream;
use std::pin::Pin;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use super::types::{HospitalEvent, Room};

pub type EventStream = Pin<Box<dyn Stream<Item = HospitalEvent> + Send>>;

#[derive(Debug, thiserror::Error)]
#[error("publish to {room} failed: {reason}")]
pub struct PublishError {
    pub room: String,
    pub reason: String,
}

/// Publish/subscribe seam between mutations and connected observers.
pub trait Broker: Send + Sync {
    /// Live events for `room` from now on. Nothing published earlier is replayed.
    fn subscribe(&self, room: &Room) -> EventStream;

    /// Returns how many observers the event was handed to.
    fn publish(&self, room: &Room, event: HospitalEvent) -> Result<usize, PublishError>;
}

/// One bounded broadcast channel per room, created on first subscription.
pub struct InProcessBroker {
    rooms: DashMap<Room, broadcast::Sender<HospitalEvent>>,
    capacity: usize,
}

impl InProcessBroker {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn sender(&self, room: &Room) -> broadcast::Sender<HospitalEvent> {
        self.rooms
            .entry(room.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Broker for InProcessBroker {
    fn subscribe(&self, room: &Room) -> EventStream {
        let room_name = room.to_string();
        let stream = BroadcastStream::new(self.sender(room).subscribe()).filter_map(
            move |item| match item {
                Ok(event) => Some(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("Observer on {} lagged, skipped {} events", room_name, skipped);
                    None
                }
            },
        );
        Box::pin(stream)
    }

    fn publish(&self, room: &Room, event: HospitalEvent) -> Result<usize, PublishError> {
        let sender = match self.rooms.get(room) {
            Some(sender) => sender.clone(),
            None => return Ok(0),
        };

        match sender.send(event) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                // Everyone left; drop the channel unless someone subscribed meanwhile.
                if let Room::Hospital(_) = room {
                    self.rooms
                        .remove_if(room, |_, sender| sender.receiver_count() == 0);
                }
                Ok(0)
            }
        }
    }
}

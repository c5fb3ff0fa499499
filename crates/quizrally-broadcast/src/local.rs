//! In-process gateway over `tokio::sync::broadcast`.

use std::collections::HashMap;

use quizrally_protocol::RoomEvent;
use tokio::sync::{broadcast, Mutex};

use crate::{ChannelId, Gateway, GatewayError};

/// Default per-channel buffer. A subscriber that falls further behind
/// than this misses events and must re-poll a snapshot, which is the
/// documented recovery path anyway.
const DEFAULT_CAPACITY: usize = 64;

/// An in-process [`Gateway`] where subscribers receive events over
/// `tokio::sync::broadcast` channels, one per room.
pub struct LocalGateway {
    channels: Mutex<HashMap<ChannelId, broadcast::Sender<RoomEvent>>>,
    capacity: usize,
}

impl LocalGateway {
    /// Creates a gateway with the default per-channel buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a gateway with a custom per-channel buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribes to a channel, creating it if it doesn't exist yet.
    ///
    /// Subscribing before the room's first event is the normal flow:
    /// clients connect right after receiving the pin.
    pub async fn subscribe(
        &self,
        channel: &ChannelId,
    ) -> broadcast::Receiver<RoomEvent> {
        let mut channels = self.channels.lock().await;
        channels
            .entry(channel.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Tears down a channel once its room is gone. Subscribers see the
    /// stream close.
    pub async fn remove_channel(&self, channel: &ChannelId) {
        if self.channels.lock().await.remove(channel).is_some() {
            tracing::debug!(%channel, "broadcast channel removed");
        }
    }
}

impl Default for LocalGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for LocalGateway {
    async fn publish(
        &self,
        channel: &ChannelId,
        event: RoomEvent,
    ) -> Result<usize, GatewayError> {
        let mut channels = self.channels.lock().await;
        let sender = channels
            .entry(channel.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        // `send` errors only when there are no receivers; for a
        // fire-and-forget notification that's zero deliveries, not a
        // failure.
        let delivered = sender.send(event).unwrap_or(0);
        tracing::trace!(%channel, delivered, "event published");
        Ok(delivered)
    }
}

// =========================================================================
// Tests
// =========================================================================

//! The broadcast gateway: pushing room events to session participants.
//!
//! The engine mutates, the store commits, and *then* an event goes out on
//! the room's channel. Delivery is best-effort by contract: the saved
//! room is the source of truth, and a client that misses an event
//! reconciles by fetching a snapshot. That contract is what lets the
//! gateway stay a thin seam — any pub/sub provider that can publish a
//! JSON event on a named channel fits behind [`Gateway`].
//!
//! [`LocalGateway`] is the in-process implementation over
//! `tokio::sync::broadcast`, used by the demo and the test suite.

#![allow(async_fn_in_trait)]

mod error;
mod local;

pub use error::GatewayError;
pub use local::LocalGateway;

use std::fmt;

use quizrally_protocol::{Pin, RoomEvent};

/// The name of a pub/sub channel. One channel per room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    /// The channel every event for `pin`'s room is published on.
    pub fn for_room(pin: Pin) -> Self {
        Self(format!("room.{pin}"))
    }

    /// The raw channel name, as an external provider would see it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publishes room events on named channels.
pub trait Gateway: Send + Sync + 'static {
    /// Publishes one event on `channel`.
    ///
    /// Returns the number of subscribers the event was handed to. Zero
    /// subscribers is success, not failure — rooms are often mutated
    /// before anyone is listening.
    async fn publish(
        &self,
        channel: &ChannelId,
        event: RoomEvent,
    ) -> Result<usize, GatewayError>;
}

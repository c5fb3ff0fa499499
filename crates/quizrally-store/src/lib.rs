//! Room persistence for Quizrally.
//!
//! The store is deliberately dumb: whole-room records keyed by pin, with
//! a time-to-live refreshed on every write. There are no partial updates;
//! every caller reads the room, modifies it, and writes the whole thing
//! back. What keeps that safe under concurrency is the **version stamp**:
//! `save` takes the version the caller read, and fails with
//! [`StoreError::VersionMismatch`] if another writer got there first.
//! Compare-and-swap with bounded retry, not locks.
//!
//! # Key types
//!
//! - [`RoomStore`] — the storage trait the service is generic over
//! - [`MemoryStore`] — the in-process implementation
//! - [`VersionedRoom`] — a room plus the version stamp to pass back on save
//!
//! A production deployment swaps [`MemoryStore`] for an implementation
//! over any key-value store with expiry and conditional writes.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod pin;

pub use error::StoreError;
pub use memory::{MemoryStore, DEFAULT_TTL};
pub use pin::generate_pin;

use quizrally_engine::Room;
use quizrally_protocol::Pin;

/// How many random pins `allocate_pin` tries before giving up. 16 misses
/// in a row requires the live-room population to be a large fraction of
/// the million-pin space.
const PIN_ALLOCATION_ATTEMPTS: usize = 16;

/// A room read from the store, paired with the version stamp that must be
/// echoed back on save for the write to win.
#[derive(Debug, Clone)]
pub struct VersionedRoom {
    pub room: Room,
    pub version: u64,
}

/// Whole-room persistence keyed by pin.
pub trait RoomStore: Send + Sync + 'static {
    /// Fetches a live room. Expired records behave as absent.
    async fn get(&self, pin: Pin) -> Result<Option<VersionedRoom>, StoreError>;

    /// Writes the full room record and refreshes its TTL.
    ///
    /// - `expected_version: None` — insert-only; fails with
    ///   [`StoreError::AlreadyExists`] if the pin is live.
    /// - `expected_version: Some(v)` — compare-and-swap; fails with
    ///   [`StoreError::VersionMismatch`] if the stored version moved, or
    ///   [`StoreError::Missing`] if the record expired underneath the
    ///   caller.
    ///
    /// Returns the new version stamp.
    async fn save(
        &self,
        room: &Room,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError>;

    /// Removes a room. Returns `true` if a live record was deleted.
    async fn delete(&self, pin: Pin) -> Result<bool, StoreError>;

    /// Picks a pin that is not currently live, retrying a bounded number
    /// of times. Note this only narrows the collision window: two
    /// concurrent allocations can still pick the same pin, which is why
    /// room creation inserts with `expected_version: None` and treats
    /// [`StoreError::AlreadyExists`] as "roll again".
    async fn allocate_pin(&self) -> Result<Pin, StoreError> {
        for _ in 0..PIN_ALLOCATION_ATTEMPTS {
            let pin = generate_pin();
            if self.get(pin).await?.is_none() {
                return Ok(pin);
            }
            tracing::debug!(%pin, "pin collision, rolling again");
        }
        Err(StoreError::PinsExhausted)
    }
}

//! In-process room store backed by a map of serialized records.
//!
//! Records are stored as serialized JSON, not as live `Room` values. That
//! keeps the contract honest: everything a caller gets back went through
//! the same round-trip a remote key-value store would force, so "it works
//! against `MemoryStore`" means the serialization actually holds.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quizrally_engine::Room;
use quizrally_protocol::Pin;
use tokio::sync::Mutex;

use crate::{RoomStore, StoreError, VersionedRoom};

/// How long a room lives after its last write: two hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// One stored room record.
struct Record {
    bytes: Vec<u8>,
    version: u64,
    expires_at: Instant,
}

/// An in-process [`RoomStore`].
///
/// All access goes through one async mutex; individual operations are
/// short (serialize, map lookup), so contention is the CAS retry loop's
/// problem, not this lock's.
pub struct MemoryStore {
    records: Mutex<HashMap<Pin, Record>>,
    ttl: Duration,
}

impl MemoryStore {
    /// Creates a store with the standard 2-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a store with a custom TTL. Tests use tiny values to
    /// exercise expiry without waiting.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Drops every expired record and returns how many were reclaimed.
    ///
    /// Expiry is also checked lazily on every `get`/`save`, so this sweep
    /// is about reclaiming memory, not correctness. Call it periodically.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, rec| rec.expires_at > now);
        let purged = before - records.len();
        if purged > 0 {
            tracing::info!(purged, live = records.len(), "expired rooms reclaimed");
        }
        purged
    }

    /// Number of records currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore for MemoryStore {
    async fn get(&self, pin: Pin) -> Result<Option<VersionedRoom>, StoreError> {
        let mut records = self.records.lock().await;
        let expired = records
            .get(&pin)
            .is_some_and(|rec| rec.expires_at <= Instant::now());
        if expired {
            // Lazy expiry: a dead record is indistinguishable from an
            // absent one.
            records.remove(&pin);
            tracing::debug!(%pin, "expired room dropped on read");
            return Ok(None);
        }
        let Some(rec) = records.get(&pin) else {
            return Ok(None);
        };
        let room: Room =
            serde_json::from_slice(&rec.bytes).map_err(StoreError::Decode)?;
        Ok(Some(VersionedRoom {
            room,
            version: rec.version,
        }))
    }

    async fn save(
        &self,
        room: &Room,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError> {
        let bytes = serde_json::to_vec(room).map_err(StoreError::Encode)?;
        let pin = room.pin;
        let now = Instant::now();

        let mut records = self.records.lock().await;
        if records
            .get(&pin)
            .is_some_and(|rec| rec.expires_at <= now)
        {
            records.remove(&pin);
        }

        let current_version = records.get(&pin).map(|rec| rec.version);
        match (expected_version, current_version) {
            (None, Some(_)) => Err(StoreError::AlreadyExists(pin)),
            (None, None) => {
                records.insert(
                    pin,
                    Record {
                        bytes,
                        version: 1,
                        expires_at: now + self.ttl,
                    },
                );
                tracing::debug!(%pin, "room record created");
                Ok(1)
            }
            (Some(_), None) => Err(StoreError::Missing(pin)),
            (Some(expected), Some(found)) if found != expected => {
                Err(StoreError::VersionMismatch {
                    pin,
                    expected,
                    found,
                })
            }
            (Some(_), Some(found)) => {
                let version = found + 1;
                records.insert(
                    pin,
                    Record {
                        bytes,
                        version,
                        expires_at: now + self.ttl,
                    },
                );
                Ok(version)
            }
        }
    }

    async fn delete(&self, pin: Pin) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        let deleted = match records.remove(&pin) {
            Some(rec) => rec.expires_at > Instant::now(),
            None => false,
        };
        if deleted {
            tracing::info!(%pin, "room deleted");
        }
        Ok(deleted)
    }
}

// =========================================================================
// Tests
// =========================================================================

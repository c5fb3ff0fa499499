//! Service configuration.

use std::time::Duration;

/// Tunables for [`QuizService`](crate::QuizService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound on any single store call. Expiry surfaces as
    /// [`ServiceError::Timeout`](crate::ServiceError::Timeout), which
    /// callers see as `Unavailable` and may retry.
    pub store_timeout: Duration,

    /// Upper bound on a broadcast publish. Publishes past the deadline
    /// are dropped (and logged), never retried inline — the saved room is
    /// already the source of truth.
    pub publish_timeout: Duration,

    /// How many times one request re-runs its read-modify-write after
    /// losing a version race before giving up. Each retry re-validates
    /// against fresh state, so the bound is about liveness under extreme
    /// contention, not correctness.
    pub max_write_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(2),
            publish_timeout: Duration::from_secs(2),
            max_write_attempts: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default_bounds_are_sane() {
        let config = ServiceConfig::default();
        assert!(config.store_timeout > Duration::ZERO);
        assert!(config.publish_timeout > Duration::ZERO);
        assert!(config.max_write_attempts >= 1);
    }
}

//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration shared by all sync engine instances.
///
/// Timeouts are carried here for the [`SyncBackend`](crate::SyncBackend)
/// implementation to apply; the engine itself has no cancellation — a
/// started cycle runs to completion or failure.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of items per push request.
    pub push_batch_size: usize,
    /// Request timeout for push/pull calls.
    pub timeout: Duration,
    /// Request timeout for suggestion pulls, which tolerate less delay
    /// because they gate a visible screen.
    pub suggestion_timeout: Duration,
}

impl SyncConfig {
    /// Sets the push batch size.
    pub fn with_push_batch_size(mut self, size: usize) -> Self {
        self.push_batch_size = size;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the suggestion pull timeout.
    pub fn with_suggestion_timeout(mut self, timeout: Duration) -> Self {
        self.suggestion_timeout = timeout;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            push_batch_size: 100,
            timeout: Duration::from_secs(15),
            suggestion_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = SyncConfig::default()
            .with_push_batch_size(25)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.push_batch_size, 25);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.suggestion_timeout, Duration::from_secs(10));
    }
}

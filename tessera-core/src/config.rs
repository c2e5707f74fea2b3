//! Loader configuration.

use serde::Deserialize;
use std::time::Duration;

/// What happens when a type whose load failed is requested again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// A new request starts a fresh load.
    #[default]
    Reattempt,
    /// The failure is cached for the lifetime of the registry.
    Sticky,
}

/// Settings for the lazy loader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoaderConfig {
    /// Retry policy for failed loads.
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Upper bound on a single fetch, in milliseconds.
    ///
    /// Only enforced when `tessera-std` is built with the `tokio` feature.
    #[serde(default)]
    pub load_timeout_ms: Option<u64>,
}

impl LoaderConfig {
    /// Default settings: reattempt failed loads, no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the fetch timeout.
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// The fetch timeout, if any.
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: LoaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.retry, RetryPolicy::Reattempt);
        assert_eq!(config.load_timeout(), None);
    }

    #[test]
    fn test_sticky_with_timeout() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{ "retry": "sticky", "load_timeout_ms": 1500 }"#).unwrap();
        assert_eq!(config.retry, RetryPolicy::Sticky);
        assert_eq!(config.load_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_builder() {
        let config = LoaderConfig::new()
            .with_retry(RetryPolicy::Sticky)
            .with_load_timeout(Duration::from_secs(2));
        assert_eq!(config.retry, RetryPolicy::Sticky);
        assert_eq!(config.load_timeout_ms, Some(2000));
    }
}

//! Shared client configuration.

use std::time::Duration;

use thiserror::Error;

use crate::query::{DEFAULT_FUZZ_RATIO, QueryBuilder};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8003";
pub const DEFAULT_SEARCH_PATH: &str = "/api/search-contractor";
pub const DEFAULT_FUZZY_PATH: &str = "/api/fuzzy-contractor";
pub const DEFAULT_DETAIL_PATH: &str = "/api/detailed-contractor";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base URL must start with http:// or https://, got {0:?}")]
    BaseUrl(String),
    #[error("debounce window must be greater than zero")]
    ZeroDebounce,
}

/// Where the service lives and how the search pipeline behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Like `http://localhost:8003` (no trailing slash).
    pub base_url: String,
    pub search_path: String,
    pub fuzzy_path: String,
    pub detail_path: String,
    /// Similarity threshold for fuzzy name matching, 0-100.
    pub fuzz_ratio: u8,
    /// Send name searches to the fuzzy-match endpoint.
    pub fuzzy: bool,
    /// Quiet period before a typed query fires.
    pub debounce: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            fuzzy_path: DEFAULT_FUZZY_PATH.to_string(),
            detail_path: DEFAULT_DETAIL_PATH.to_string(),
            fuzz_ratio: DEFAULT_FUZZ_RATIO,
            fuzzy: false,
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
        .normalized()
    }

    /// Trim trailing slashes from the base URL.
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.base_url.clone()));
        }
        if self.debounce.is_zero() {
            return Err(ConfigError::ZeroDebounce);
        }
        Ok(())
    }

    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.fuzz_ratio, self.fuzzy)
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }

    pub fn fuzzy_url(&self) -> String {
        format!("{}{}", self.base_url, self.fuzzy_path)
    }

    pub fn detail_url(&self) -> String {
        format!("{}{}", self.base_url, self.detail_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_service() {
        let config = ClientConfig::default();
        assert_eq!(config.search_url(), "http://localhost:8003/api/search-contractor");
        assert_eq!(config.fuzzy_url(), "http://localhost:8003/api/fuzzy-contractor");
        assert_eq!(config.detail_url(), "http://localhost:8003/api/detailed-contractor");
        assert_eq!(config.fuzz_ratio, 75);
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trailing_slash_trimmed() {
        let config = ClientConfig::with_base_url("http://example.test:9000//");
        assert_eq!(config.base_url, "http://example.test:9000");
        assert_eq!(config.detail_url(), "http://example.test:9000/api/detailed-contractor");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig::with_base_url("localhost:8003");
        assert_eq!(
            config.validate(),
            Err(ConfigError::BaseUrl("localhost:8003".into()))
        );
    }

    #[test]
    fn rejects_zero_debounce() {
        let config = ClientConfig {
            debounce: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDebounce));
    }

    #[test]
    fn query_builder_carries_fuzzy_settings() {
        let config = ClientConfig {
            fuzzy: true,
            fuzz_ratio: 60,
            ..ClientConfig::default()
        };
        let query = config
            .query_builder()
            .build(&crate::SearchInput::by_name("Acme"))
            .unwrap();
        assert!(query.is_fuzzy());
        assert_eq!(query.fuzz_threshold(), 60);
    }
}

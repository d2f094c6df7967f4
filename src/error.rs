//! Error types for verse-search
//!
//! Nothing in the search path itself is fatal: no-match is an empty result and
//! provider failures only cost a preview. These types cover the edges of the
//! crate (the content provider, configuration, and session setup).

use thiserror::Error;

/// Failures reported by a verse-content provider
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Verse not found: {0}")]
    NotFound(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Get the error code for CLI and JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::NotFound(_) => "not_found",
            ProviderError::RequestFailed(_) => "request_failed",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Convert reqwest::Error to ProviderError
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

/// Convert serde_json::Error to ProviderError
impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResponse(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Search session must be created inside a tokio runtime")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let error = ProviderError::NotFound("JHN.3.16".to_string());
        assert_eq!(error.to_string(), "Verse not found: JHN.3.16");
        assert_eq!(error.error_code(), "not_found");

        let error = ProviderError::RequestFailed("connection refused".to_string());
        assert_eq!(error.to_string(), "Request failed: connection refused");
        assert_eq!(error.error_code(), "request_failed");

        let error = ProviderError::InvalidResponse("not json".to_string());
        assert_eq!(error.to_string(), "Invalid response: not json");
        assert_eq!(error.error_code(), "invalid_response");
    }

    #[test]
    fn test_serde_error_maps_to_invalid_response() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            ProviderError::from(err),
            ProviderError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Invalid("debounce_ms must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: debounce_ms must be positive"
        );
    }
}

//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a timeout and the crate user agent.
//! Proxy environment variables (HTTPS_PROXY, NO_PROXY, ...) are honored by reqwest.

use crate::error::ProviderError;
use reqwest::Client;
use std::time::Duration;

/// Build a reqwest Client with the given timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("verse-search/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::RequestFailed(format!("Failed to create HTTP client: {}", e)))
}

//! HTTP client for the self-hosted verse database
//!
//! The database exposes a single `POST {base}/db/query` endpoint that runs SQL
//! against a per-translation database file and answers `{"rows": [...]}`.

use super::provider::VerseProvider;
use super::verse::Verse;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::client_with_timeout;
use futures::future::BoxFuture;
use futures::FutureExt;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

static RE_VERSE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Z]{3}\.[0-9]+\.[0-9]+$").expect("valid verse key regex"));

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    user_id: &'a str,
    db_file: &'a str,
    sql: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<VerseRow>,
}

#[derive(Debug, Deserialize)]
struct VerseRow {
    id: Option<String>,
    reference: Option<String>,
    content: Option<String>,
}

/// Verse provider talking to the remote verse database
pub struct HttpVerseProvider {
    client: Client,
    endpoint: Url,
    user_id: String,
    password: String,
}

impl HttpVerseProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ProviderError::RequestFailed(format!("Invalid base URL {:?}: {}", config.base_url, e))
        })?;
        let endpoint = base
            .join("db/query")
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint: {}", e)))?;

        Ok(Self {
            client: client_with_timeout(Duration::from_secs(config.timeout_secs))?,
            endpoint,
            user_id: config.user_id.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch a single verse by key (`"JHN.3.16"`)
    pub async fn fetch(&self, reference: &str, translation_id: &str) -> Result<Verse, ProviderError> {
        // The key is spliced into SQL; only well-formed keys may pass
        if !RE_VERSE_KEY.is_match(reference) {
            return Err(ProviderError::NotFound(reference.to_string()));
        }

        let request = QueryRequest {
            user_id: &self.user_id,
            db_file: translation_id,
            sql: format!("SELECT * FROM verses WHERE id = '{}';", reference),
        };

        debug!("Fetching verse {} ({}) from {}", reference, translation_id, self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-central-password", &self.password)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {} for {}",
                status, reference
            )));
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        let row = parsed
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(reference.to_string()))?;

        match (row.content, row.reference) {
            (Some(content), Some(row_reference)) => Ok(Verse {
                id: row.id.unwrap_or_else(|| row_reference.clone()),
                reference: row_reference,
                content,
            }),
            _ => Err(ProviderError::NotFound(reference.to_string())),
        }
    }
}

impl VerseProvider for HttpVerseProvider {
    fn fetch_verse<'a>(
        &'a self,
        reference: &'a str,
        translation_id: &'a str,
    ) -> BoxFuture<'a, Result<Verse, ProviderError>> {
        self.fetch(reference, translation_id).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Serve a stub of the verse database on a random local port
    async fn stub_server() -> String {
        async fn query(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, String) {
            if headers.get("x-central-password").and_then(|v| v.to_str().ok()) != Some("secret") {
                return (StatusCode::UNAUTHORIZED, "denied".to_string());
            }
            let sql = body["sql"].as_str().unwrap_or_default();
            let db_file = body["db_file"].as_str().unwrap_or_default();
            let payload = if db_file == "BROKEN" {
                return (StatusCode::OK, "<html>oops</html>".to_string());
            } else if sql.contains("'JHN.3.16'") {
                json!({"rows": [{
                    "id": "JHN.3.16",
                    "reference": "John 3:16",
                    "content": "<p>16 For God so loved the world</p>"
                }]})
            } else if sql.contains("'GEN.1.1'") {
                json!({"rows": [{"reference": "Genesis 1:1", "content": "In the beginning"}]})
            } else if sql.contains("'GEN.1.2'") {
                json!({"rows": [{"id": "GEN.1.2"}]})
            } else {
                json!({"rows": []})
            };
            (StatusCode::OK, payload.to_string())
        }

        let app = Router::new().route("/db/query", post(query));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: &str, password: &str) -> HttpVerseProvider {
        HttpVerseProvider::new(&ProviderConfig {
            base_url: base_url.to_string(),
            user_id: "local-reader".to_string(),
            password: password.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        let p = provider("http://localhost:4005", "x");
        assert_eq!(p.endpoint().as_str(), "http://localhost:4005/db/query");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpVerseProvider::new(&ProviderConfig {
            base_url: "::nope".to_string(),
            user_id: String::new(),
            password: String::new(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_verse() {
        let base = stub_server().await;
        let p = provider(&base, "secret");

        let verse = p.fetch_verse("JHN.3.16", "KJV").await.unwrap();
        assert_eq!(verse.id, "JHN.3.16");
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.cleaned_text(), "For God so loved the world");
    }

    #[tokio::test]
    async fn test_missing_id_falls_back_to_reference() {
        let base = stub_server().await;
        let verse = provider(&base, "secret").fetch("GEN.1.1", "KJV").await.unwrap();
        assert_eq!(verse.id, "Genesis 1:1");
    }

    #[tokio::test]
    async fn test_not_found() {
        let base = stub_server().await;
        let p = provider(&base, "secret");

        assert!(matches!(p.fetch("REV.22.99", "KJV").await, Err(ProviderError::NotFound(_))));
        // Row without content
        assert!(matches!(p.fetch("GEN.1.2", "KJV").await, Err(ProviderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_key_never_sent() {
        let p = provider("http://127.0.0.1:9", "secret");
        let result = p.fetch("JHN.3.16'; DROP TABLE verses; --", "KJV").await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = stub_server().await;
        let result = provider(&base, "wrong").fetch("JHN.3.16", "KJV").await;
        assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let base = stub_server().await;
        let result = provider(&base, "secret").fetch("JHN.3.16", "BROKEN").await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on the discard port
        let result = provider("http://127.0.0.1:9", "secret").fetch("JHN.3.16", "KJV").await;
        assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
    }
}

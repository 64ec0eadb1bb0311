//! HTTP gateway: the form's view of the backend REST API.
//!
//! Idempotent reads are retried a bounded number of times on transport
//! failure. Submissions are sent exactly once per call; after an ambiguous
//! failure the caller must check the stored response before trying again.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{CatalogProvider, GatewayError, SubmissionGateway};
use crate::errors::codes;
use crate::models::{Catalog, PublicClient, StyleResponse, StyleSelections};

const DEFAULT_READ_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Gateway speaking to the backend over its JSON API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    read_attempts: u32,
    retry_backoff: Duration,
}

impl HttpGateway {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            read_attempts: DEFAULT_READ_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Total attempts for read requests (at least one).
    pub fn with_read_attempts(mut self, attempts: u32) -> Self {
        self.read_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with bounded retries on transport errors only.
    async fn get_with_retry<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let mut attempt = 1;
        loop {
            let result = match self.http.get(self.url(path)).send().await {
                Ok(resp) => read_envelope(resp).await,
                Err(e) => Err(GatewayError::Transport(e.to_string())),
            };

            match result {
                Err(GatewayError::Transport(msg)) if attempt < self.read_attempts => {
                    tracing::warn!(path, attempt, "Read failed, retrying: {}", msg);
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl SubmissionGateway for HttpGateway {
    async fn fetch_client(&self, client_id: &str) -> Result<PublicClient, GatewayError> {
        self.get_with_retry(&format!("/api/form/{}", client_id))
            .await
    }

    async fn submit_response(
        &self,
        client_id: &str,
        selections: &StyleSelections,
    ) -> Result<StyleResponse, GatewayError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/form/{}/response", client_id)))
            .json(selections)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        read_envelope(resp).await
    }

    async fn fetch_response(&self, client_id: &str) -> Result<Option<StyleResponse>, GatewayError> {
        match self
            .get_with_retry(&format!("/api/form/{}/response", client_id))
            .await
        {
            Ok(response) => Ok(Some(response)),
            Err(GatewayError::ClientNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl CatalogProvider for HttpGateway {
    async fn fetch_catalog(&self) -> Result<Catalog, GatewayError> {
        self.get_with_retry("/api/catalog").await
    }
}

/// Unwrap the `{success, data | error}` envelope.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

    let Ok(mut body) = serde_json::from_str::<Value>(&text) else {
        // Not an envelope, e.g. an extractor rejection or a proxy error page
        return Err(classify_bare_status(status, text));
    };

    if body["success"].as_bool() == Some(true) {
        return serde_json::from_value(body["data"].take())
            .map_err(|e| GatewayError::Transport(format!("Malformed response body: {}", e)));
    }

    let code = body["error"]["code"].as_str().unwrap_or_default();
    let message = body["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    Err(match code {
        codes::ALREADY_COMPLETED => GatewayError::AlreadyCompleted,
        codes::NOT_FOUND => GatewayError::ClientNotFound,
        codes::VALIDATION_ERROR | codes::BAD_REQUEST => GatewayError::Rejected(message),
        _ if status.is_client_error() => GatewayError::Rejected(format!("{}: {}", code, message)),
        _ => GatewayError::Transport(format!("{} {}: {}", status.as_u16(), code, message)),
    })
}

fn classify_bare_status(status: StatusCode, text: String) -> GatewayError {
    match status {
        StatusCode::NOT_FOUND => GatewayError::ClientNotFound,
        StatusCode::CONFLICT => GatewayError::AlreadyCompleted,
        s if s.is_client_error() => GatewayError::Rejected(text),
        s => GatewayError::Transport(format!("{}: {}", s.as_u16(), text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new("http://localhost:8080/");
        assert_eq!(gateway.url("/api/catalog"), "http://localhost:8080/api/catalog");
    }

    #[test]
    fn test_read_attempts_never_zero() {
        let gateway = HttpGateway::new("http://localhost").with_read_attempts(0);
        assert_eq!(gateway.read_attempts, 1);
    }

    #[test]
    fn test_bare_status_classification() {
        assert_eq!(
            classify_bare_status(StatusCode::CONFLICT, String::new()),
            GatewayError::AlreadyCompleted
        );
        assert!(matches!(
            classify_bare_status(StatusCode::UNPROCESSABLE_ENTITY, "bad json".into()),
            GatewayError::Rejected(_)
        ));
        assert!(matches!(
            classify_bare_status(StatusCode::BAD_GATEWAY, String::new()),
            GatewayError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error_after_retries() {
        // Port 9 (discard) on localhost is almost never listening
        let gateway = HttpGateway::new("http://127.0.0.1:9")
            .with_read_attempts(2)
            .with_retry_backoff(Duration::from_millis(1));

        let err = gateway.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}

//! HTTP-backed key source for providers that serve armored key exports
//! over plain GET endpoints.

use crate::capabilities::KeySource;
use crate::error::ProofError;
use async_trait::async_trait;
use linkproof_types::ExternalUsername;
use std::time::Duration;

/// Default timeout for key document requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches `GET {base_url}/{username}/keys` and splits the response into
/// individual armored key documents.
pub struct HttpKeySource {
    base_url: String,
    /// HTTP client (reusable connection pool).
    client: reqwest::Client,
}

impl HttpKeySource {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

/// Split a response body into the armored public-key documents it
/// contains (BEGIN through END, inclusive). Text between documents is
/// dropped.
fn split_key_documents(body: &str) -> Vec<String> {
    const BEGIN: &str = "-----BEGIN LINKPROOF PUBLIC KEY-----";
    const END: &str = "-----END LINKPROOF PUBLIC KEY-----";

    let mut documents = Vec::new();
    let mut rest = body;
    loop {
        let Some(start) = rest.find(BEGIN) else { break };
        let after_start = &rest[start..];
        let Some(end) = after_start.find(END) else { break };
        documents.push(after_start[..end + END.len()].to_string());
        rest = &after_start[end + END.len()..];
    }
    documents
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_key_documents(
        &self,
        username: &ExternalUsername,
    ) -> Result<Vec<String>, ProofError> {
        let url = format!("{}/{}/keys", self.base_url, username);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProofError::KeyFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProofError::KeyFetchFailed(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProofError::KeyFetchFailed(e.to_string()))?;

        let documents = split_key_documents(&body);
        if documents.is_empty() {
            return Err(ProofError::KeyFetchFailed(format!(
                "no armored key documents in response from {url}"
            )));
        }
        Ok(documents)
    }
}

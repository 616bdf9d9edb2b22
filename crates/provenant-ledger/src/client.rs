//! HTTP implementation of the [`Ledger`] capability.
//!
//! Requests are retried on connection failures, timeouts, HTTP 429 and 5xx
//! with exponential backoff. Once the retry budget is spent the last error is
//! returned to the caller, which performs no further retries.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::payload::{ArtifactRecord, LatestCommitResponse, PreviousCommitResponse};
use crate::{
    ApprovalPayload, ArtifactPayload, ArtifactSummary, BackfillPayload, Ledger, LedgerError,
    LedgerResult,
};

/// Artifacts requested per page when listing a pipeline.
pub const ARTIFACTS_PER_PAGE: u32 = 15;

/// Time allowed for a whole request, response body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Ledger client talking to the REST API.
pub struct HttpLedger {
    base: Url,
    owner: String,
    api_token: String,
    max_retries: u32,
    timeout: Duration,
    backoff: Duration,
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpLedger {
    /// Creates a new ledger client.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not a usable base URL, or if the HTTP
    /// client or its runtime cannot be built.
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        api_token: impl Into<String>,
        max_retries: u32,
    ) -> LedgerResult<Self> {
        let host = host.into();
        let base = Url::parse(&host).map_err(|e| LedgerError::InvalidHost {
            host: host.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(LedgerError::InvalidHost {
                host,
                reason: "not a base URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(LedgerError::Client)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LedgerError::Runtime)?;

        Ok(Self {
            base,
            owner: owner.into(),
            api_token: api_token.into(),
            max_retries,
            timeout: DEFAULT_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
            client,
            runtime,
        })
    }

    /// Sets the time allowed for each request attempt.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the URL of `segments` under the host, each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Cannot fail: the base was checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Returns the URL of a resource under a pipeline.
    fn pipeline_url(&self, pipeline: &str, path: &[&str]) -> Url {
        let mut segments = vec!["api", "v1", "projects", self.owner.as_str(), pipeline];
        segments.extend_from_slice(path);
        self.endpoint(&segments)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> LedgerResult<T> {
        let body = self.execute(Method::GET, url.clone(), None)?;
        serde_json::from_str(&body).map_err(|source| LedgerError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn send_json<T: Serialize>(&self, method: Method, url: Url, payload: &T) -> LedgerResult<()> {
        let body = serde_json::to_vec(payload).map_err(LedgerError::Encode)?;
        self.execute(method, url, Some(body))?;
        Ok(())
    }

    fn execute(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> LedgerResult<String> {
        self.runtime.block_on(self.send(method, url, body))
    }

    async fn send(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> LedgerResult<String> {
        let mut attempt = 0;

        loop {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .timeout(self.timeout)
                .basic_auth(&self.api_token, Some("unset"));
            if let Some(body) = &body {
                request = request
                    .header(CONTENT_TYPE, "application/json; charset=utf-8")
                    .body(body.clone());
            }

            debug!(%method, %url, attempt, "sending request");
            let outcome = request.send().await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(err) => err.is_connect() || err.is_timeout(),
            };
            if retryable && attempt < self.max_retries {
                let delay = backoff_delay(self.backoff, attempt);
                attempt += 1;
                warn!(%method, %url, attempt, ?delay, "request failed, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            let transport = |source| LedgerError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                source,
            };
            let response = outcome.map_err(transport)?;
            let status = response.status();
            let text = response.text().await.map_err(transport)?;

            if status != StatusCode::OK && status != StatusCode::CREATED {
                return Err(LedgerError::Status {
                    method: method.to_string(),
                    url: url.to_string(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            return Ok(text);
        }
    }
}

impl Ledger for HttpLedger {
    fn latest_commit(&self, pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>> {
        let url = self.pipeline_url(pipeline, &["artifacts", fingerprint, "latest_commit"]);
        let response: LatestCommitResponse = self.get_json(url)?;
        Ok(response.latest_commit)
    }

    fn previous_commit(&self, pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>> {
        let url = self.pipeline_url(pipeline, &["artifacts", fingerprint, "previous_commit"]);
        let response: PreviousCommitResponse = self.get_json(url)?;
        Ok(response.previous_commit)
    }

    fn submit_artifact(&self, pipeline: &str, payload: &ArtifactPayload) -> LedgerResult<()> {
        let url = self.pipeline_url(pipeline, &["artifacts", ""]);
        self.send_json(Method::PUT, url, payload)
    }

    fn list_artifacts(&self, pipeline: &str, page: u32) -> LedgerResult<Vec<ArtifactSummary>> {
        let mut url = self.pipeline_url(pipeline, &["artifacts", ""]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &ARTIFACTS_PER_PAGE.to_string());
        let records: Vec<ArtifactRecord> = self.get_json(url)?;
        Ok(records
            .into_iter()
            .map(|record| record.evidence.artifact)
            .collect())
    }

    fn submit_backfill(
        &self,
        pipeline: &str,
        fingerprint: &str,
        payload: &BackfillPayload,
    ) -> LedgerResult<()> {
        let url = self.pipeline_url(pipeline, &["artifacts", fingerprint, "backfill_commits"]);
        self.send_json(Method::PUT, url, payload)
    }

    fn request_approval(&self, pipeline: &str, payload: &ApprovalPayload) -> LedgerResult<()> {
        let url = self.pipeline_url(pipeline, &["approvals", ""]);
        self.send_json(Method::POST, url, payload)
    }

    fn ready(&self) -> LedgerResult<()> {
        let url = self.endpoint(&["ready"]);
        self.execute(Method::GET, url, None)?;
        Ok(())
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns the delay before retry number `attempt` (zero based).
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1 << attempt.min(16)).min(MAX_BACKOFF)
}

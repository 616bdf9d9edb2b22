//! Error types for the ledger client.

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger client error types.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The configured host is not a usable base URL.
    #[error("invalid ledger host {host}: {reason}")]
    InvalidHost { host: String, reason: String },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Failed to start the async runtime.
    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),

    /// The request could not be sent or the response could not be read.
    #[error("failed to send {method} request to {url}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected status.
    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized.
    #[error("failed to serialize payload")]
    Encode(#[source] serde_json::Error),
}

//! Ledger service client for Provenant.
//!
//! This crate handles:
//! - The [`Ledger`] capability consumed by the reporting logic
//! - Typed request payloads and response records
//! - An HTTP implementation with bounded retries

pub mod client;
pub mod error;
pub mod payload;

pub use client::HttpLedger;
pub use error::{LedgerError, LedgerResult};
pub use payload::{ApprovalPayload, ArtifactPayload, ArtifactSummary, BackfillPayload};

/// Operations offered by the ledger service.
///
/// Implementations are chosen once when a command is built. All calls block
/// until the service answered or retries were exhausted.
pub trait Ledger {
    /// Returns the commit of the latest artifact recorded in the pipeline,
    /// other than the artifact identified by `fingerprint`.
    ///
    /// This is where the changelog of a new `fingerprint` starts. `None`
    /// means the pipeline holds no other artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn latest_commit(&self, pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>>;

    /// Returns the commit of the artifact reported before `fingerprint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn previous_commit(&self, pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>>;

    /// Records an artifact. Repeating the call with the same payload is safe.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or rejects the payload.
    fn submit_artifact(&self, pipeline: &str, payload: &ArtifactPayload) -> LedgerResult<()>;

    /// Returns one page of the artifacts recorded in a pipeline.
    ///
    /// An empty page means there are no more artifacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn list_artifacts(&self, pipeline: &str, page: u32) -> LedgerResult<Vec<ArtifactSummary>>;

    /// Replaces the changelog stored for an already recorded artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or rejects the payload.
    fn submit_backfill(
        &self,
        pipeline: &str,
        fingerprint: &str,
        payload: &BackfillPayload,
    ) -> LedgerResult<()>;

    /// Asks for an approval of an artifact covering a range of commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or rejects the payload.
    fn request_approval(&self, pipeline: &str, payload: &ApprovalPayload) -> LedgerResult<()>;

    /// Checks that the service is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or not ready.
    fn ready(&self) -> LedgerResult<()>;
}

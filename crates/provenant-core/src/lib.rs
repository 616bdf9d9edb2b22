//! Core library for Provenant.
//!
//! This crate provides the changelog reconciliation and the orchestration of
//! every operation sent to the ledger.

mod approval;
mod backfill;
mod changelog;
mod context;
mod error;
mod fingerprint;
mod remote;
mod report;

#[cfg(test)]
mod testing;

pub use approval::{ApprovalRequest, request_approval};
pub use backfill::backfill_pipeline;
pub use changelog::{Changelog, reconcile};
pub use context::ReportContext;
pub use error::{CoreError, CoreResult};
pub use fingerprint::{artifact_filename, fingerprint_file};
pub use remote::repo_url;
pub use report::{ArtifactRequest, report_artifact};

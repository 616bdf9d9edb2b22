//! Commit record types for Provenant.
//!
//! This crate provides [`ArtifactCommit`], the projection of a Git commit
//! that is attached to every artifact report sent to the ledger.

mod artifact;

pub use artifact::ArtifactCommit;

//! Read-only Git history access for Provenant.
//!
//! This crate provides the Git operations needed to build a changelog:
//! - Revision resolution
//! - Current branch inspection
//! - Commit range traversal
//! - Remote URL lookup and normalization

mod error;
mod remote;
mod repository;

pub use error::{GitError, GitResult};
pub use remote::normalize_remote_url;
pub use repository::Repository;

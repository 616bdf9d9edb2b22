//! Artifact fingerprints.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Computes the SHA-256 of a file as lowercase hex.
///
/// # Errors
///
/// Returns [`CoreError::Fingerprint`] if the path is not a readable regular
/// file.
pub fn fingerprint_file(path: &Path) -> CoreResult<String> {
    let fail = |reason: String| CoreError::Fingerprint {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = path.metadata().map_err(|e| fail(e.to_string()))?;
    if !metadata.is_file() {
        return Err(fail("not a regular file".to_string()));
    }

    let mut file = File::open(path).map_err(|e| fail(e.to_string()))?;
    let mut hasher = Sha256::new();
    let size = io::copy(&mut file, &mut hasher).map_err(|e| fail(e.to_string()))?;

    let digest = hex::encode(hasher.finalize());
    debug!(path = %path.display(), size, %digest, "fingerprinted artifact");
    Ok(digest)
}

/// Returns the name an artifact is reported under: the last path component.
#[must_use]
pub fn artifact_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

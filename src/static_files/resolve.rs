//! Resolution of request paths under a media root.
//!
//! Traversal is rejected twice: lexically while cleaning the decoded
//! segments (before touching the disk), and again after canonicalization so
//! symlinks cannot lead out of the root either.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::StaticError;

/// Percent-decode and clean `relative`, rejecting any `..` that climbs
/// above the root.
pub fn clean_relative(relative: &str) -> Result<PathBuf, StaticError> {
    let decoded = percent_decode_str(relative)
        .decode_utf8()
        .map_err(|_| StaticError::InvalidPath)?;
    if decoded.contains('\0') {
        return Err(StaticError::InvalidPath);
    }

    let mut clean = PathBuf::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if !clean.pop() {
                    return Err(StaticError::PathEscapesRoot);
                }
            }
            name => clean.push(name),
        }
    }
    Ok(clean)
}

/// Resolve `relative` against the canonical `root`.
///
/// Fails with [`StaticError::NotFound`] when nothing exists there and with
/// [`StaticError::PathEscapesRoot`] when the resolution leaves the root.
pub async fn resolve(root: &Path, relative: &str) -> Result<PathBuf, StaticError> {
    let candidate = root.join(clean_relative(relative)?);
    let canonical = tokio::fs::canonicalize(&candidate).await?;
    if !canonical.starts_with(root) {
        return Err(StaticError::PathEscapesRoot);
    }
    Ok(canonical)
}

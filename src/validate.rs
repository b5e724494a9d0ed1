//! Root path validation.
//! Verifies that source and target are existing, non-symlink directories and
//! returns their canonical absolute forms before any work is scheduled.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{MergeMoveError, RootProblem};

/// Validate both roots and return `(source, target)` in canonical form.
///
/// Identical roots are accepted (the merge is then a no-op). A target nested
/// inside the source is rejected: every move into it would relocate a tree
/// into its own descendant.
pub fn validate_roots(source: &Path, target: &Path) -> Result<(PathBuf, PathBuf), MergeMoveError> {
    let src = check_root(source).map_err(|problem| MergeMoveError::InvalidSource {
        path: source.to_path_buf(),
        problem,
    })?;
    let dst = check_root(target).map_err(|problem| MergeMoveError::InvalidTarget {
        path: target.to_path_buf(),
        problem,
    })?;

    if dst != src && dst.starts_with(&src) {
        return Err(MergeMoveError::InvalidTarget {
            path: target.to_path_buf(),
            problem: RootProblem::InsideSource(src),
        });
    }

    debug!(source = %src.display(), target = %dst.display(), "roots validated");
    Ok((src, dst))
}

/// Check one root without following a symlink at the leaf, then canonicalize.
fn check_root(path: &Path) -> Result<PathBuf, RootProblem> {
    // Rebuilding from components drops `.` segments and a trailing slash,
    // which would otherwise make lstat resolve a symlinked leaf.
    let abs: PathBuf = std::path::absolute(path)
        .map_err(RootProblem::Missing)?
        .components()
        .collect();

    let meta = fs::symlink_metadata(&abs).map_err(RootProblem::Missing)?;
    let ftype = meta.file_type();
    if ftype.is_symlink() {
        return Err(RootProblem::Symlink);
    }
    if !ftype.is_dir() {
        return Err(RootProblem::NotADirectory);
    }

    dunce::canonicalize(&abs).map_err(RootProblem::Missing)
}

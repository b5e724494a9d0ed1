//! I/O helper utilities.
//!
//! Enriches io::Error with the operation, the path and a platform-aware hint
//! so per-entry failures printed in verbose mode are actionable.
//!
//! Usage:
//!   fs::read_dir(dir).map_err(io_error_with_help("read directory", dir))?;

use std::io;
use std::path::Path;

#[cfg(unix)]
use libc;

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permission on both parent directories)");
                }
                libc::EXDEV => {
                    msg.push_str(" (source and target are on different filesystems; only renames are performed)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; a mount point or open handle blocks the rename)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path vanished during the run)");
                }
                libc::EEXIST | libc::ENOTEMPTY => {
                    msg.push_str(" (target appeared after the existence check; left untouched)");
                }
                libc::EINVAL => {
                    msg.push_str(" (cannot move a directory into itself)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem)");
                }
                libc::ELOOP => {
                    msg.push_str(" (too many symbolic link levels; possible symlink cycle)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long)");
                }
                libc::EMFILE => {
                    msg.push_str(" (process file descriptor limit reached; lower --workers or raise the limit)");
                }
                libc::ENFILE => {
                    msg.push_str(" (system-wide file table overflow)");
                }
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permission on both parent directories)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path vanished during the run)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (target already exists; left untouched)");
            }
            _ => {}
        }
    }

    msg
}

/// Returns a closure suitable for `.map_err(...)` that keeps the original
/// ErrorKind and replaces the message with an enriched one.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_hint_includes_op_and_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let err = io_error_with_help("stat", p)(io::Error::from(io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.contains("stat"));
        assert!(msg.contains("/nonexistent/path/for/test"));
        assert!(msg.contains("vanished"));
    }

    #[test]
    fn adapter_preserves_kind() {
        let p = Path::new("/tmp/x");
        let err = io_error_with_help("move", p)(io::Error::from(io::ErrorKind::AlreadyExists));
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(err.to_string().contains("left untouched"));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_hint_mentions_filesystems() {
        let p = Path::new("/mnt/a");
        let err = io_error_with_help("move", p)(io::Error::from_raw_os_error(libc::EXDEV));
        let msg = err.to_string();
        assert!(msg.contains("different filesystems"), "msg was: {msg}");
        assert!(msg.contains("os code"));
    }

    #[cfg(unix)]
    #[test]
    fn fd_limit_hint_points_at_workers() {
        let p = Path::new("/tmp");
        let err =
            io_error_with_help("read directory", p)(io::Error::from_raw_os_error(libc::EMFILE));
        assert!(err.to_string().contains("--workers"));
    }
}

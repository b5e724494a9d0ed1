//! Atomic rename helper.
//! - Linux: renameat2(RENAME_NOREPLACE) so a target created after the existence
//!   probe is never replaced; falls back to rename(2) where the flag is unsupported.
//! - Elsewhere: plain rename.

use std::fs;
use std::io;
use std::path::Path;

/// Rename `src` to `dst`, refusing to replace an existing `dst` where the OS allows it.
pub fn rename_no_replace(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(target_os = "linux")]
    {
        match renameat2_noreplace(src, dst) {
            // Filesystem or kernel without RENAME_NOREPLACE support.
            Err(e) if matches!(e.raw_os_error(), Some(libc::EINVAL) | Some(libc::ENOSYS)) => {}
            other => return other,
        }
    }

    fs::rename(src, dst)
}

#[cfg(target_os = "linux")]
fn renameat2_noreplace(src: &Path, dst: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let src_c = CString::new(src.as_os_str().as_bytes())?;
    let dst_c = CString::new(dst.as_os_str().as_bytes())?;

    // SAFETY: both pointers come from live CStrings; AT_FDCWD resolves relative paths
    // against the cwd, and callers always pass absolute paths.
    let rc = unsafe {
        libc::syscall(
            libc::SYS_renameat2,
            libc::AT_FDCWD,
            src_c.as_ptr(),
            libc::AT_FDCWD,
            dst_c.as_ptr(),
            libc::RENAME_NOREPLACE,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

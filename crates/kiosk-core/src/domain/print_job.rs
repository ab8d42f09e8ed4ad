//! Print-job claim markers.
//!
//! A spooled file is claimed by renaming it to `<original>.<n>.printed`,
//! where `<n>` comes from a process-wide [`ClaimCounter`].  The rename is
//! the only thing that prevents a file from being sent twice: anything whose
//! name ends in [`CLAIM_SUFFIX`] is never picked up again, by this process or
//! a later one.
//!
//! [`ClaimCounter`]: crate::protocol::ClaimCounter

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix marking a spool file as taken.
pub const CLAIM_SUFFIX: &str = ".printed";

/// Returns `true` if `file_name` already carries the claim marker.
pub fn is_claimed(file_name: &str) -> bool {
    file_name.ends_with(CLAIM_SUFFIX)
}

/// Path a spool file is renamed to when claim number `n` is assigned.
///
/// ```rust
/// use std::path::Path;
/// use kiosk_core::domain::print_job::claimed_path;
///
/// let p = claimed_path(Path::new("/spool/job.ps"), 7);
/// assert_eq!(p, Path::new("/spool/job.ps.7.printed"));
/// ```
pub fn claimed_path(path: &Path, n: u64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{n}{CLAIM_SUFFIX}"));
    PathBuf::from(name)
}

/// Where a print job is in its delivery.
///
/// ```text
/// Discovered ─▶ Claimed ─▶ Uploading ─▶ Delivered
///                              │  ▲
///                              ▼  │ retry
///                            Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Discovered,
    Claimed,
    Uploading,
    Delivered,
    /// The last attempt failed; the job will be re-sent.
    Failed,
}

impl DeliveryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryState::Delivered)
    }
}

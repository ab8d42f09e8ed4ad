//! PrintJobUploader: finds spooled print files, claims them, and prepares
//! their uploads.
//!
//! # Delivery guarantees (for beginners)
//!
//! A print file must reach the server at least once and must never be sent
//! under two different names.  Both follow from one rule: *rename before
//! sending*.  On each tick the uploader:
//!
//! 1. Lists every printer's spool directory, oldest file first.
//! 2. Skips files that already end in `.printed`.
//! 3. Renames the file to `<name>.<n>.printed` (`n` from a process-wide
//!    counter).  If the rename fails the file is left alone and picked up on
//!    a later tick.
//! 4. Opens the renamed file and reads it once.  The resulting
//!    [`PrintJob`] keeps the file handle open and holds the content in a
//!    shared buffer, so every retry sends the same bytes.
//!
//! Sending and retrying is the session client's job: a failed upload is
//! re-sent immediately with the same [`PrintJob`], without limit.
//!
//! A claimed file that cannot be opened or read is abandoned: it already carries the
//! marker, so no later scan will pick it up again.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use kiosk_core::protocol::ClaimCounter;
use kiosk_core::{claimed_path, is_claimed, DeliveryState};
use tracing::{debug, info, warn};

use crate::application::ports::PrintUpload;

/// One claimed print file on its way to the server.
#[derive(Debug)]
pub struct PrintJob {
    pub claimed_path: PathBuf,
    pub state: DeliveryState,
    /// Number of upload attempts started so far.
    pub attempts: u32,
    pub upload: PrintUpload,
    // Held open until the job is delivered and dropped.
    _handle: File,
}

impl PrintJob {
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
        self.state = DeliveryState::Uploading;
    }

    pub fn mark_failed(&mut self) {
        self.state = DeliveryState::Failed;
    }

    pub fn mark_delivered(&mut self) {
        self.state = DeliveryState::Delivered;
    }
}

/// Scans spool directories and claims print files.
#[derive(Debug, Default)]
pub struct PrintJobUploader {
    claims: ClaimCounter,
}

impl PrintJobUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every eligible file in every printer's spool directory and
    /// returns the jobs ready for upload.
    ///
    /// A spool directory that does not exist is created; if that fails the
    /// printer is skipped for this tick.
    pub fn collect(
        &self,
        printers: &[(String, PathBuf)],
        client_name: &str,
        username: &str,
    ) -> Vec<PrintJob> {
        let mut jobs = Vec::new();

        for (printer, dir) in printers {
            if !dir.is_dir() {
                debug!(%printer, dir = %dir.display(), "creating missing spool directory");
                if let Err(e) = fs::create_dir_all(dir) {
                    warn!(%printer, dir = %dir.display(), "cannot create spool directory: {e}");
                    continue;
                }
            }

            let files = match spooled_files(dir) {
                Ok(files) => files,
                Err(e) => {
                    warn!(%printer, dir = %dir.display(), "cannot list spool directory: {e}");
                    continue;
                }
            };

            for path in files {
                if let Some(job) = self.claim(&path, printer, client_name, username) {
                    jobs.push(job);
                }
            }
        }

        jobs
    }

    fn claim(
        &self,
        path: &Path,
        printer: &str,
        client_name: &str,
        username: &str,
    ) -> Option<PrintJob> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        if is_claimed(&file_name) {
            return None;
        }

        let target = claimed_path(path, self.claims.next_claim());
        if let Err(e) = fs::rename(path, &target) {
            warn!(file = %path.display(), "claim rename failed, skipping file: {e}");
            return None;
        }
        info!(printer, file = %file_name, claimed = %target.display(), "claimed print job");

        let (handle, content) = match open_and_read(&target) {
            Ok(opened) => opened,
            Err(e) => {
                warn!(file = %target.display(), "cannot read claimed print job, abandoning it: {e}");
                return None;
            }
        };

        Some(PrintJob {
            claimed_path: target,
            state: DeliveryState::Claimed,
            attempts: 0,
            upload: PrintUpload {
                client_name: client_name.to_string(),
                username: username.to_string(),
                printer: printer.to_string(),
                file_name,
                content,
            },
            _handle: handle,
        })
    }

    /// Deletes every file in every spool directory, claimed or not.
    /// Returns the number of files removed.
    pub fn discard_spooled(&self, printers: &[(String, PathBuf)]) -> usize {
        let mut removed = 0;
        for (printer, dir) in printers {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.file_type().is_ok_and(is_spool_entry) {
                    continue;
                }
                let path = entry.path();
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(%printer, file = %path.display(), "cannot delete print job: {e}"),
                }
            }
        }
        if removed > 0 {
            info!(removed, "discarded spooled print jobs");
        }
        removed
    }
}

/// Spoolers drop either regular files or links to them.
fn is_spool_entry(file_type: fs::FileType) -> bool {
    file_type.is_file() || file_type.is_symlink()
}

/// Spool entries in `dir`, oldest modification time first (ties by name).
fn spooled_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)?
        .flatten()
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !is_spool_entry(meta.file_type()) {
                return None;
            }
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, entry.path()))
        })
        .collect();
    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn open_and_read(path: &Path) -> std::io::Result<(File, Bytes)> {
    let mut file = File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok((file, Bytes::from(content)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

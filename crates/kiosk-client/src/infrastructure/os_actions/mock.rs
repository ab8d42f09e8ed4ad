//! Recording OS-action double for tests.
//!
//! `RecordingOsActions` never touches the OS; it pushes every requested
//! [`OsAction`] into a `Mutex<Vec<...>>` so tests can assert what the client
//! asked for and in which order.
//!
//! Set `should_fail` to make every call return a spawn error.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::application::ports::{OsAction, OsActionError, OsActions};

#[derive(Debug, Default)]
pub struct RecordingOsActions {
    performed: Mutex<Vec<OsAction>>,
    pub should_fail: AtomicBool,
}

impl RecordingOsActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the actions requested so far.
    pub fn performed(&self) -> Vec<OsAction> {
        self.performed.lock().unwrap().clone()
    }
}

impl OsActions for RecordingOsActions {
    fn perform(&self, action: &OsAction) -> Result<(), OsActionError> {
        self.performed.lock().unwrap().push(action.clone());
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(OsActionError::Spawn {
                program: format!("{action:?}"),
                source: io::Error::new(io::ErrorKind::NotFound, "mock failure"),
            });
        }
        Ok(())
    }
}

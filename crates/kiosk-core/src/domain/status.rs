//! Server-directed availability of the workstation.

/// Availability overlay, independent of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Online,
    Suspended,
}

/// Remembers the last raw `status` string seen in a registration reply and
/// reports transitions.
///
/// The raw string is kept (not the parsed [`ClientStatus`]) because the
/// server may send values this client does not know; those still count as
/// "the previous value" for change detection.
#[derive(Debug, Clone)]
pub struct StatusTracker {
    current: String,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            current: "online".to_string(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Records `status` and returns the transition to announce, if any.
    ///
    /// Only a changed value of `"suspended"` or `"online"` yields an event.
    /// The new value is stored either way.
    pub fn observe(&mut self, status: &str) -> Option<ClientStatus> {
        let changed = status != self.current;
        self.current = status.to_string();
        if !changed {
            return None;
        }
        match status {
            "suspended" => Some(ClientStatus::Suspended),
            "online" => Some(ClientStatus::Online),
            _ => None,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

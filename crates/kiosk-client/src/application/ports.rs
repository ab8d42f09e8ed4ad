//! Capability traits the application layer depends on.
//!
//! Every side effect the client performs (HTTP, UDP, processes, timers, the
//! settings file, the UI) goes through one of these traits.  Implementations
//! live in the infrastructure layer and are injected at construction time,
//! which keeps the session logic testable without a network or a desktop.
//!
//! All traits take `&self` and are `Send + Sync`: collaborators are shared as
//! `Arc<dyn Trait>` between the session client and the tasks it spawns.
//! Implementations that keep state use interior mutability.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use kiosk_core::protocol::wol::MagicPacket;
use thiserror::Error;

use crate::application::events::UiEvent;

// ── Network transport ─────────────────────────────────────────────────────────

/// Broad class of a failed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The server could not be reached (refused, unreachable, DNS failure).
    Connect,
    Timeout,
    /// TLS negotiation failed outright.
    Tls,
    /// The server answered with a non-success HTTP status.
    HttpStatus(u16),
    /// The response body could not be read.
    Body,
    /// Any other failure building or sending the request.
    Request,
}

impl TransportErrorKind {
    /// Numeric code shown on the server-access warning channel.
    ///
    /// HTTP failures use the status code itself; transport-level failures use
    /// small fixed codes below 100.
    pub fn code(self) -> u16 {
        match self {
            TransportErrorKind::Connect => 1,
            TransportErrorKind::Timeout => 4,
            TransportErrorKind::Tls => 6,
            TransportErrorKind::Body => 2,
            TransportErrorKind::Request => 99,
            TransportErrorKind::HttpStatus(status) => status,
        }
    }
}

/// A failed request, classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {}", .kind.code(), .description)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub description: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// Multipart print submission.
#[derive(Clone, PartialEq, Eq)]
pub struct PrintUpload {
    /// Node name (`client_name` field).
    pub client_name: String,
    pub username: String,
    pub printer: String,
    /// Name of the spooled file before it was claimed.
    pub file_name: String,
    /// File content.  Cloning shares the same buffer, so every retry sends
    /// byte-identical content.
    pub content: Bytes,
}

impl fmt::Debug for PrintUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintUpload")
            .field("client_name", &self.client_name)
            .field("username", &self.username)
            .field("printer", &self.printer)
            .field("file_name", &self.file_name)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// HTTP access to the management server and the outside world.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// `GET` on the management endpoint with the given query items; returns
    /// the response body.
    async fn get(&self, query: &[(String, String)]) -> Result<Bytes, TransportError>;

    /// Bare `GET` of an arbitrary URL; only success or failure matters.
    async fn probe(&self, url: &str) -> Result<(), TransportError>;

    /// Multipart `POST` of one print job to the upload endpoint.
    async fn upload(&self, upload: &PrintUpload) -> Result<(), TransportError>;
}

// ── Persistent configuration ──────────────────────────────────────────────────

/// Error type for the persistent settings store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A required setting is missing or empty.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for setting {key}")]
    Invalid { key: &'static str, value: String },
}

/// Key/value settings surviving process restarts.
///
/// Keys are `group/name`.  Writes are visible to `get` immediately and reach
/// durable storage on [`sync`](ConfigStore::sync).  There are no multi-key
/// transactions.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    /// Names (without the group prefix) of every key in `group`, sorted.
    fn keys_in_group(&self, group: &str) -> Vec<String>;

    /// Flushes pending writes.
    fn sync(&self) -> Result<(), ConfigError>;
}

// ── OS actions ────────────────────────────────────────────────────────────────

/// Abstract local side effect.  Platform adapters decide how to carry it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsAction {
    Shutdown,
    Restart,
    Suspend,
    /// Log the OS user out of the desktop session.
    EndDesktopSession,
    /// Launch a configured login/logout script.
    RunScript(String),
    /// Launch the regular user shell instead of the kiosk client.
    StartShell(String),
    /// Lock the desktop down before the client takes over.
    DesktopStartup,
    /// Give the patron a desktop after login.
    DesktopSessionOpened,
    /// Take the desktop away after logout.
    DesktopSessionClosed,
}

#[derive(Debug, Error)]
pub enum OsActionError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Carries out [`OsAction`]s.  Launches are fire-and-forget: the call returns
/// once the process has been started.
#[cfg_attr(test, mockall::automock)]
pub trait OsActions: Send + Sync {
    fn perform(&self, action: &OsAction) -> Result<(), OsActionError>;
}

// ── Wake-on-LAN ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WakeError {
    #[error("could not resolve wake-on-LAN destination {host}:{port}")]
    Unresolved { host: String, port: u16 },

    #[error("wake-on-LAN socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no async runtime available to send the wake-on-LAN packet")]
    NoRuntime,
}

/// Sends one magic packet as a single UDP datagram.  Must not block the
/// caller: name lookup and socket I/O happen off the event loop.
#[cfg_attr(test, mockall::automock)]
pub trait WakeOnLanSender: Send + Sync {
    fn send(&self, packet: &MagicPacket, host: &str, port: u16) -> Result<(), WakeError>;
}

// ── UI events ─────────────────────────────────────────────────────────────────

/// Receives the events the client emits for the UI layer.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// The client's periodic schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Registration,
    Connectivity,
    UserData,
    PrintUpload,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Registration,
        TimerKind::Connectivity,
        TimerKind::UserData,
        TimerKind::PrintUpload,
    ];

    /// Fixed period of this schedule.
    pub fn period(self) -> Duration {
        match self {
            TimerKind::Registration | TimerKind::Connectivity | TimerKind::UserData => {
                Duration::from_secs(10)
            }
            TimerKind::PrintUpload => Duration::from_secs(2),
        }
    }
}

/// Periodic task control.  Ticks are delivered to the client as events; a
/// tick's work may still be in flight when the next tick of the same timer
/// fires.
pub trait Scheduler: Send + Sync {
    /// Starts (or restarts) `kind` with the given period.  The first tick
    /// fires one period from now.
    fn start(&self, kind: TimerKind, every: Duration);

    fn stop(&self, kind: TimerKind);

    /// Delivers one tick of `kind` as soon as possible.
    fn fire_once(&self, kind: TimerKind);

    fn is_running(&self, kind: TimerKind) -> bool;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_carries_code_and_description() {
        let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
        assert_eq!(err.to_string(), "1: connection refused");
    }

    #[test]
    fn test_http_status_code_is_the_status() {
        assert_eq!(TransportErrorKind::HttpStatus(503).code(), 503);
        assert_eq!(TransportErrorKind::Timeout.code(), 4);
    }

    #[test]
    fn test_print_upload_debug_omits_content() {
        // Arrange
        let upload = PrintUpload {
            client_name: "kiosk-01".into(),
            username: "alice".into(),
            printer: "laser".into(),
            file_name: "job.ps".into(),
            content: Bytes::from_static(b"%!PS-secret"),
        };

        // Act
        let rendered = format!("{upload:?}");

        // Assert
        assert!(rendered.contains("content_len: 11"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_timer_periods() {
        assert_eq!(TimerKind::Registration.period(), Duration::from_secs(10));
        assert_eq!(TimerKind::Connectivity.period(), Duration::from_secs(10));
        assert_eq!(TimerKind::UserData.period(), Duration::from_secs(10));
        assert_eq!(TimerKind::PrintUpload.period(), Duration::from_secs(2));
    }
}

//! Bridge between the session client and whatever front end is attached.
//!
//! The client emits [`UiEvent`]s through the `EventSink` port.  This module
//! provides:
//!
//! - [`ChannelEventSink`] – an `EventSink` that forwards events onto a tokio
//!   channel, so the front end can consume them on its own task.
//! - [`UiEventDto`] – a serialisable snapshot of each event.  The headless
//!   binary prints one JSON object per line on standard output, which lets a
//!   separate window process (or a shell script) follow the session.
//! - [`console`] – the line-oriented command reader used by the headless
//!   binary.
//!
//! # Event stream format (for beginners)
//!
//! Each line is a JSON object with an `event` tag:
//!
//! ```json
//! {"event":"login_succeeded","username":"alice","units":45,"hold_items_count":2}
//! {"event":"time_updated","units":44}
//! {"event":"server_access_warning","text":""}
//! ```
//!
//! The login event's password is not part of the stream.

pub mod console;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::events::UiEvent;
use crate::application::ports::EventSink;

// ── Sink ──────────────────────────────────────────────────────────────────────

/// Forwards events onto an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: UnboundedSender<UiEvent>,
}

impl ChannelEventSink {
    /// Creates the sink and the receiver the front end reads from.
    pub fn new() -> (Self, UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: UiEvent) {
        debug!(?event, "UI event");
        if self.tx.send(event).is_err() {
            debug!("UI receiver gone; event dropped");
        }
    }
}

// ── DTO ───────────────────────────────────────────────────────────────────────

/// Serialisable form of a [`UiEvent`].  Mirrors the event one to one except
/// that `login_succeeded` carries no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEventDto {
    LoginSucceeded {
        username: String,
        units: i64,
        hold_items_count: i64,
    },
    LoginFailed {
        code: String,
    },
    LogoutSucceeded,
    LogoutFailed,
    ReservationStatus {
        reserved_for: String,
    },
    BannersChanged,
    ClientSuspended,
    ClientOnline,
    TimeUpdated {
        units: i64,
    },
    MessageReceived {
        text: String,
    },
    AllowClose {
        allow: bool,
    },
    ServerAccessWarning {
        text: String,
    },
    InternetAccessWarning {
        text: String,
    },
    StyleSheetChanged {
        stylesheet: String,
    },
}

impl From<&UiEvent> for UiEventDto {
    fn from(event: &UiEvent) -> Self {
        match event {
            UiEvent::LoginSucceeded {
                username,
                units,
                hold_items_count,
                ..
            } => UiEventDto::LoginSucceeded {
                username: username.clone(),
                units: *units,
                hold_items_count: *hold_items_count,
            },
            UiEvent::LoginFailed(code) => UiEventDto::LoginFailed { code: code.clone() },
            UiEvent::LogoutSucceeded => UiEventDto::LogoutSucceeded,
            UiEvent::LogoutFailed => UiEventDto::LogoutFailed,
            UiEvent::ReservationStatus(user) => UiEventDto::ReservationStatus {
                reserved_for: user.clone(),
            },
            UiEvent::BannersChanged => UiEventDto::BannersChanged,
            UiEvent::ClientSuspended => UiEventDto::ClientSuspended,
            UiEvent::ClientOnline => UiEventDto::ClientOnline,
            UiEvent::TimeUpdated(units) => UiEventDto::TimeUpdated { units: *units },
            UiEvent::MessageReceived(text) => UiEventDto::MessageReceived { text: text.clone() },
            UiEvent::AllowClose(allow) => UiEventDto::AllowClose { allow: *allow },
            UiEvent::ServerAccessWarning(text) => {
                UiEventDto::ServerAccessWarning { text: text.clone() }
            }
            UiEvent::InternetAccessWarning(text) => {
                UiEventDto::InternetAccessWarning { text: text.clone() }
            }
            UiEvent::StyleSheetChanged(css) => UiEventDto::StyleSheetChanged {
                stylesheet: css.clone(),
            },
        }
    }
}

/// One line of the event stream (without the trailing newline).
pub fn render_event(event: &UiEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&UiEventDto::from(event))
}

// ── Headless front end ────────────────────────────────────────────────────────

/// Prints every event as a JSON line on standard output until the channel
/// closes.  Warnings and session changes are also logged.
pub fn spawn_event_printer(mut rx: UnboundedReceiver<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            log_event(&event);
            match render_event(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("could not render UI event: {e}"),
            }
        }
    })
}

fn log_event(event: &UiEvent) {
    match event {
        UiEvent::LoginSucceeded { username, units, .. } => {
            info!(%username, units, "logged in")
        }
        UiEvent::LoginFailed(code) => info!(%code, "login rejected"),
        UiEvent::LogoutSucceeded => info!("logged out"),
        UiEvent::ServerAccessWarning(text) if !text.is_empty() => {
            warn!(%text, "management server unreachable")
        }
        UiEvent::InternetAccessWarning(text) if !text.is_empty() => {
            warn!(%text, "internet access problem")
        }
        UiEvent::MessageReceived(text) => info!(%text, "message from staff"),
        _ => {}
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Events emitted to, and commands received from, the UI layer.

use std::fmt;

/// Everything the client tells the UI.
#[derive(Clone, PartialEq, Eq)]
pub enum UiEvent {
    LoginSucceeded {
        username: String,
        password: String,
        units: i64,
        hold_items_count: i64,
    },
    /// Server-supplied error code, or `NETWORK_ERROR` / `INVALID_RESPONSE`.
    LoginFailed(String),
    LogoutSucceeded,
    LogoutFailed,
    /// Username the station is reserved for; empty when not reserved.
    ReservationStatus(String),
    BannersChanged,
    ClientSuspended,
    ClientOnline,
    /// Units (minutes) remaining in the session.
    TimeUpdated(i64),
    MessageReceived(String),
    AllowClose(bool),
    /// Management server problem; empty clears the warning.
    ServerAccessWarning(String),
    /// General internet problem; empty clears the warning.
    InternetAccessWarning(String),
    StyleSheetChanged(String),
}

impl fmt::Debug for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiEvent::LoginSucceeded {
                username,
                units,
                hold_items_count,
                ..
            } => f
                .debug_struct("LoginSucceeded")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("units", units)
                .field("hold_items_count", hold_items_count)
                .finish(),
            UiEvent::LoginFailed(code) => f.debug_tuple("LoginFailed").field(code).finish(),
            UiEvent::LogoutSucceeded => f.write_str("LogoutSucceeded"),
            UiEvent::LogoutFailed => f.write_str("LogoutFailed"),
            UiEvent::ReservationStatus(user) => {
                f.debug_tuple("ReservationStatus").field(user).finish()
            }
            UiEvent::BannersChanged => f.write_str("BannersChanged"),
            UiEvent::ClientSuspended => f.write_str("ClientSuspended"),
            UiEvent::ClientOnline => f.write_str("ClientOnline"),
            UiEvent::TimeUpdated(units) => f.debug_tuple("TimeUpdated").field(units).finish(),
            UiEvent::MessageReceived(text) => {
                f.debug_tuple("MessageReceived").field(text).finish()
            }
            UiEvent::AllowClose(allow) => f.debug_tuple("AllowClose").field(allow).finish(),
            UiEvent::ServerAccessWarning(text) => {
                f.debug_tuple("ServerAccessWarning").field(text).finish()
            }
            UiEvent::InternetAccessWarning(text) => {
                f.debug_tuple("InternetAccessWarning").field(text).finish()
            }
            UiEvent::StyleSheetChanged(css) => f
                .debug_tuple("StyleSheetChanged")
                .field(&format_args!("{} bytes", css.len()))
                .finish(),
        }
    }
}

/// Requests from the UI.
#[derive(Clone, PartialEq, Eq)]
pub enum UiCommand {
    AttemptLogin { username: String, password: String },
    AttemptLogout,
    AcknowledgeReservation(String),
    ClearMessage,
}

impl fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiCommand::AttemptLogin { username, .. } => f
                .debug_struct("AttemptLogin")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            UiCommand::AttemptLogout => f.write_str("AttemptLogout"),
            UiCommand::AcknowledgeReservation(user) => {
                f.debug_tuple("AcknowledgeReservation").field(user).finish()
            }
            UiCommand::ClearMessage => f.write_str("ClearMessage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_event_debug_redacts_password() {
        let event = UiEvent::LoginSucceeded {
            username: "alice".into(),
            password: "pw123".into(),
            units: 45,
            hold_items_count: 2,
        };
        let rendered = format!("{event:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("pw123"));
    }

    #[test]
    fn test_login_command_debug_redacts_password() {
        let cmd = UiCommand::AttemptLogin {
            username: "bob".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{cmd:?}").contains("hunter2"));
    }
}

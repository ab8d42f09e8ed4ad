//! Local session state machine.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//!                  begin_login            login_succeeded
//! Unauthenticated ────────────▶ Authenticating ─────────────▶ Active
//!       ▲   │                        │ login_failed              │
//!       │   └──── unlock ────────────┼───────────────────────────▶│
//!       │                            ▼                           │ begin_logout
//!       ├──────────────────── Unauthenticated                    ▼
//!       │                                                    LoggingOut
//!       └──────────────────── finish_logout / end_session ◀──────┘
//! ```
//!
//! Credentials live *inside* the `Authenticating` and `Active` variants, so
//! leaving either state drops them.  There is no way to observe a username or
//! password while the machine is `Unauthenticated` or `LoggingOut`.
//!
//! Every transition is checked: calling an operation from the wrong state
//! returns [`SessionError::InvalidTransition`] and leaves the state untouched.

use std::fmt;

use thiserror::Error;

// ── Credentials ───────────────────────────────────────────────────────────────

/// Username/password pair for the signed-in patron.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating {
        credentials: Credentials,
    },
    Active {
        credentials: Credentials,
        units: i64,
        hold_items_count: i64,
    },
    LoggingOut,
}

impl SessionState {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "Unauthenticated",
            SessionState::Authenticating { .. } => "Authenticating",
            SessionState::Active { .. } => "Active",
            SessionState::LoggingOut => "LoggingOut",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation} while {from}")]
    InvalidTransition {
        from: &'static str,
        operation: &'static str,
    },
}

/// Owner of the current [`SessionState`].
#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Credentials of the pending or active session, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.state {
            SessionState::Authenticating { credentials }
            | SessionState::Active { credentials, .. } => Some(credentials),
            SessionState::Unauthenticated | SessionState::LoggingOut => None,
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.state.name(),
            operation,
        }
    }

    /// `Unauthenticated → Authenticating`.
    pub fn begin_login(&mut self, credentials: Credentials) -> Result<(), SessionError> {
        match self.state {
            SessionState::Unauthenticated => {
                self.state = SessionState::Authenticating { credentials };
                Ok(())
            }
            _ => Err(self.invalid("begin login")),
        }
    }

    /// `Authenticating → Active`.  Returns the now-active credentials.
    pub fn login_succeeded(
        &mut self,
        units: i64,
        hold_items_count: i64,
    ) -> Result<Credentials, SessionError> {
        match std::mem::replace(&mut self.state, SessionState::Unauthenticated) {
            SessionState::Authenticating { credentials } => {
                self.state = SessionState::Active {
                    credentials: credentials.clone(),
                    units,
                    hold_items_count,
                };
                Ok(credentials)
            }
            other => {
                self.state = other;
                Err(self.invalid("complete login"))
            }
        }
    }

    /// `Authenticating → Unauthenticated`, dropping the credentials.
    pub fn login_failed(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Authenticating { .. } => {
                self.state = SessionState::Unauthenticated;
                Ok(())
            }
            _ => Err(self.invalid("fail login")),
        }
    }

    /// Server-initiated guest session: `Unauthenticated → Active` with an
    /// empty password and no hold items.
    pub fn unlock(&mut self, username: &str, minutes: i64) -> Result<Credentials, SessionError> {
        match self.state {
            SessionState::Unauthenticated => {
                let credentials = Credentials::new(username, "");
                self.state = SessionState::Active {
                    credentials: credentials.clone(),
                    units: minutes,
                    hold_items_count: 0,
                };
                Ok(credentials)
            }
            _ => Err(self.invalid("unlock")),
        }
    }

    /// Records the units remaining reported by the server.
    pub fn update_units(&mut self, new_units: i64) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Active { units, .. } => {
                *units = new_units;
                Ok(())
            }
            _ => Err(self.invalid("update units")),
        }
    }

    /// `Active → LoggingOut`.  Returns the credentials one last time so the
    /// caller can build the logout request; the machine no longer holds them.
    pub fn begin_logout(&mut self) -> Result<Credentials, SessionError> {
        match std::mem::replace(&mut self.state, SessionState::LoggingOut) {
            SessionState::Active { credentials, .. } => Ok(credentials),
            other => {
                self.state = other;
                Err(self.invalid("begin logout"))
            }
        }
    }

    /// `LoggingOut → Unauthenticated`.
    pub fn finish_logout(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::LoggingOut => {
                self.state = SessionState::Unauthenticated;
                Ok(())
            }
            _ => Err(self.invalid("finish logout")),
        }
    }

    /// Immediate local logout forced by the server (kicked, logged out, or
    /// out of time): `Active | LoggingOut → Unauthenticated`.
    pub fn end_session(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active { .. } | SessionState::LoggingOut => {
                self.state = SessionState::Unauthenticated;
                Ok(())
            }
            _ => Err(self.invalid("end session")),
        }
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Logout action ─────────────────────────────────────────────────────────────

/// What the workstation does after a patron's session ends
/// (`node/logoutAction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoutAction {
    #[default]
    None,
    /// End the OS desktop session.
    Logout,
    Reboot,
}

impl From<&str> for LogoutAction {
    /// Unknown values mean "do nothing".
    fn from(value: &str) -> Self {
        match value.trim() {
            "logout" => LogoutAction::Logout,
            "reboot" => LogoutAction::Reboot,
            _ => LogoutAction::None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Typed view over the persistent settings namespaces.
//!
//! The store itself is an untyped `group/name → string` map (see
//! [`ConfigStore`]).  This module names the keys the client reads and turns
//! them into typed values, applying the defaults used when a key is absent.
//!
//! ```toml
//! [node]
//! location = "Main Library"
//! type = "adult"
//! age_limit = "18"
//! logoutAction = "reboot"
//!
//! [server]
//! host = "kiosk.example.org"
//! port = 443
//! scheme = "https"
//!
//! [printers]
//! "Front Desk Laser" = "/var/spool/kiosk/front-desk"
//!
//! [scriptlogin]
//! enable = "1"
//! script = "/usr/local/bin/on-login.sh"
//! ```

use std::path::PathBuf;

use kiosk_core::LogoutAction;

use crate::application::ports::{ConfigError, ConfigStore};

// ── Keys ──────────────────────────────────────────────────────────────────────

pub const NODE_NAME: &str = "node/name";
pub const NODE_LOCATION: &str = "node/location";
pub const NODE_TYPE: &str = "node/type";
pub const NODE_AGE_LIMIT: &str = "node/age_limit";
pub const NODE_LOGOUT_ACTION: &str = "node/logoutAction";
pub const NODE_ONLY_RUN_FOR: &str = "node/onlyRunFor";
pub const NODE_ONLY_STOP_FOR: &str = "node/onlyStopFor";
pub const NODE_START_USER_SHELL: &str = "node/start_user_shell";

pub const SERVER_HOST: &str = "server/host";
pub const SERVER_PORT: &str = "server/port";
pub const SERVER_SCHEME: &str = "server/scheme";

pub const SESSION_LOGGED_IN_USER: &str = "session/LoggedInUser";
pub const SESSION_CLIENT_BEHAVIOR: &str = "session/ClientBehavior";
pub const SESSION_RESERVATION_SHOW_USERNAME: &str = "session/ReservationShowUsername";
pub const SESSION_CONNECTIVITY_URLS: &str = "session/InternetConnectivityURLs";

pub const IMAGES_LOGO: &str = "images/logo";
pub const IMAGES_LOGO_WIDTH: &str = "images/logo_width";
pub const IMAGES_LOGO_HEIGHT: &str = "images/logo_height";

pub const PRINTERS_GROUP: &str = "printers";
pub const SCRIPT_LOGIN_GROUP: &str = "scriptlogin";
pub const SCRIPT_LOGOUT_GROUP: &str = "scriptlogout";

/// Store key for a `session/*` setting written by the directive dispatcher.
pub fn session_key(name: &str) -> String {
    format!("session/{name}")
}

// ── Server endpoint ───────────────────────────────────────────────────────────

/// Where the management server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl ServerEndpoint {
    /// `scheme://host[:port]` with no trailing slash.
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// Port used to reach the server, falling back to the scheme default.
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.scheme == "https" { 443 } else { 80 })
    }
}

// ── Startup settings ──────────────────────────────────────────────────────────

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Explicit node name; `None` means "use the hostname".
    pub node_name: Option<String>,
    pub location: String,
    pub node_type: String,
    pub age_limit: String,
    pub logout_action: LogoutAction,
    pub only_run_for: Vec<String>,
    pub only_stop_for: Vec<String>,
    pub start_user_shell: Option<String>,
    pub server: ServerEndpoint,
}

impl ClientSettings {
    /// Reads the `node/*` and `server/*` groups.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `server/host` is absent and
    /// [`ConfigError::Invalid`] when `server/port` is not a port number.
    pub fn load(store: &dyn ConfigStore) -> Result<Self, ConfigError> {
        let host = non_empty(store, SERVER_HOST).ok_or(ConfigError::Missing(SERVER_HOST))?;

        let port = match non_empty(store, SERVER_PORT) {
            None => None,
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(0) => None,
                Ok(port) => Some(port),
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        key: SERVER_PORT,
                        value: raw,
                    })
                }
            },
        };

        let scheme = non_empty(store, SERVER_SCHEME).unwrap_or_else(|| "http".to_string());

        Ok(Self {
            node_name: non_empty(store, NODE_NAME),
            location: text(store, NODE_LOCATION),
            node_type: text(store, NODE_TYPE),
            age_limit: text(store, NODE_AGE_LIMIT),
            logout_action: LogoutAction::from(text(store, NODE_LOGOUT_ACTION).as_str()),
            only_run_for: user_list(store, NODE_ONLY_RUN_FOR),
            only_stop_for: user_list(store, NODE_ONLY_STOP_FOR),
            start_user_shell: non_empty(store, NODE_START_USER_SHELL),
            server: ServerEndpoint { scheme, host, port },
        })
    }
}

// ── Live lookups ──────────────────────────────────────────────────────────────

/// Configured printers as `(name, spool directory)`, ordered by name.
pub fn printers(store: &dyn ConfigStore) -> Vec<(String, PathBuf)> {
    store
        .keys_in_group(PRINTERS_GROUP)
        .into_iter()
        .filter_map(|name| {
            let dir = store.get(&format!("{PRINTERS_GROUP}/{name}"))?;
            (!dir.is_empty()).then(|| (name, PathBuf::from(dir)))
        })
        .collect()
}

/// Script to run for `group` (`scriptlogin` / `scriptlogout`) when its
/// `enable` key is exactly `"1"`.
pub fn enabled_script(store: &dyn ConfigStore, group: &str) -> Option<String> {
    let enabled = store.get(&format!("{group}/enable")).unwrap_or_default();
    if enabled.trim() != "1" {
        return None;
    }
    store
        .get(&format!("{group}/script"))
        .filter(|script| !script.is_empty())
}

fn text(store: &dyn ConfigStore, key: &str) -> String {
    store.get(key).unwrap_or_default()
}

fn non_empty(store: &dyn ConfigStore, key: &str) -> Option<String> {
    store.get(key).filter(|v| !v.trim().is_empty())
}

fn user_list(store: &dyn ConfigStore, key: &str) -> Vec<String> {
    text(store, key)
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

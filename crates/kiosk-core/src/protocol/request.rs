//! Outbound request model for the management API.
//!
//! Every management call is a `GET` on [`API_BASE_PATH`] whose behaviour is
//! selected by the `action` query item.  The node's identity is repeated on
//! every call so the server can track the workstation without a separate
//! handshake:
//!
//! ```text
//! GET /api/client/v1_0?node=..&location=..&type=..&ipaddress=..&macaddress=..
//!                     &hostname=..&version=..&action=login&username=..&password=..
//! ```
//!
//! Print uploads are the one exception: they are a multipart `POST` to
//! [`PRINT_UPLOAD_PATH`] and are modelled by the client's transport, not here.

use std::fmt;

use crate::domain::node::NodeIdentity;
use crate::domain::session::Credentials;

/// Path of the management API endpoint.
pub const API_BASE_PATH: &str = "/api/client/v1_0";

/// Path of the multipart print upload endpoint.
pub const PRINT_UPLOAD_PATH: &str = "/api/client/v1_0/print";

/// Operation selected by the `action` query item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RegisterNode,
    Login,
    Logout,
    GetUserData,
    ClearMessage,
    AcknowledgeReservation,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::RegisterNode => "register_node",
            Action::Login => "login",
            Action::Logout => "logout",
            Action::GetUserData => "get_user_data",
            Action::ClearMessage => "clear_message",
            Action::AcknowledgeReservation => "acknowledge_reservation",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One management API call: the action plus its action-specific query items.
///
/// The common identity items are added by [`ApiRequest::query_pairs`] at send
/// time so a request can be built before the identity is known to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub action: Action,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(action: Action) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    fn with_credentials(self, credentials: &Credentials) -> Self {
        self.with("username", credentials.username())
            .with("password", credentials.password())
    }

    /// Heartbeat/registration call carrying the node's name and age limit.
    pub fn register_node(identity: &NodeIdentity) -> Self {
        Self::new(Action::RegisterNode)
            .with("node_name", identity.name.as_str())
            .with("age_limit", identity.age_limit.as_str())
    }

    pub fn login(credentials: &Credentials) -> Self {
        Self::new(Action::Login).with_credentials(credentials)
    }

    pub fn logout(credentials: &Credentials) -> Self {
        Self::new(Action::Logout).with_credentials(credentials)
    }

    pub fn get_user_data(credentials: &Credentials) -> Self {
        Self::new(Action::GetUserData).with_credentials(credentials)
    }

    pub fn clear_message(credentials: &Credentials) -> Self {
        Self::new(Action::ClearMessage).with_credentials(credentials)
    }

    pub fn acknowledge_reservation(reserved_for: &str) -> Self {
        Self::new(Action::AcknowledgeReservation).with("reserved_for", reserved_for)
    }

    /// Returns the full, ordered query for this request.
    ///
    /// Order: `node`, `location`, `type`, `ipaddress`, `macaddress`,
    /// `hostname`, `version`, `action`, then the action-specific items.
    pub fn query_pairs(&self, identity: &NodeIdentity, version: &str) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("node".to_string(), identity.name.clone()),
            ("location".to_string(), identity.location.clone()),
            ("type".to_string(), identity.node_type.clone()),
            ("ipaddress".to_string(), identity.ip_address.clone()),
            ("macaddress".to_string(), identity.mac_address.clone()),
            ("hostname".to_string(), identity.hostname.clone()),
            ("version".to_string(), version.to_string()),
            ("action".to_string(), self.action.as_str().to_string()),
        ];
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| {
                if k == "password" {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("action", &self.action)
            .field("params", &params)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

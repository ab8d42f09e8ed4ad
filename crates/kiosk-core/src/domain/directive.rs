//! Directives extracted from one registration (heartbeat) reply.
//!
//! A [`RemoteDirectives`] value is the typed view of everything the server
//! asked for in a single poll.  It is built fresh each time and is never
//! merged with the previous poll: a server that keeps answering
//! `"restart": true` gets a restart on every poll.

use tracing::warn;

use crate::protocol::response::RegisterNodeResponse;
use crate::protocol::wol::MacAddress;

/// Session settings whose change triggers a banner refresh.
pub const BANNER_KEYS: [&str; 3] = ["LogoURL", "BannerTopURL", "BannerBottomURL"];

/// Server-initiated guest login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlock {
    pub username: String,
    pub minutes: i64,
}

/// Power state change requested by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Shutdown,
    Suspend,
    Restart,
}

impl PowerAction {
    /// Shutdown and restart end the process, so the UI must be allowed to
    /// close first.  Suspend resumes in place.
    pub fn requires_allow_close(self) -> bool {
        matches!(self, PowerAction::Shutdown | PowerAction::Restart)
    }
}

/// Wake-on-LAN request: one magic packet per target, all sent to the same
/// destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeRequest {
    pub targets: Vec<MacAddress>,
    pub host: String,
    pub port: u16,
}

/// Login-screen logo; only built when the reply names a non-empty image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    pub url: String,
    pub width: String,
    pub height: String,
}

/// Everything requested by one registration reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteDirectives {
    pub registered: bool,
    pub unlock: Option<Unlock>,
    /// Power actions in application order.
    pub power: Vec<PowerAction>,
    pub wake: Option<WakeRequest>,
    /// Non-empty stylesheet text to hand to the UI.
    pub stylesheet: Option<String>,
    /// `session/*` settings present in the reply, as `(name, value)`.
    pub settings: Vec<(&'static str, String)>,
    pub logo: Option<LogoImage>,
    /// Reservation target; empty when the station is not reserved.
    pub reserved_for: String,
    /// Raw availability status; `None` when the reply did not carry one.
    pub status: Option<String>,
}

impl RemoteDirectives {
    pub fn from_response(resp: &RegisterNodeResponse) -> Self {
        let unlock = resp.unlock.then(|| Unlock {
            username: resp.username.clone(),
            minutes: resp.minutes,
        });

        let power = [
            (resp.shutdown, PowerAction::Shutdown),
            (resp.suspend, PowerAction::Suspend),
            (resp.restart, PowerAction::Restart),
        ]
        .into_iter()
        .filter_map(|(requested, action)| requested.then_some(action))
        .collect();

        let wake = if resp.wakeup { wake_request(resp) } else { None };

        let stylesheet = resp
            .client_style_sheet
            .as_ref()
            .filter(|s| !s.is_empty())
            .cloned();

        let logo = resp
            .logo
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| LogoImage {
                url: url.clone(),
                width: resp.logo_width.clone().unwrap_or_default(),
                height: resp.logo_height.clone().unwrap_or_default(),
            });

        Self {
            registered: resp.registered,
            unlock,
            power,
            wake,
            stylesheet,
            settings: resp.session_settings(),
            logo,
            reserved_for: resp.reserved_for.clone(),
            status: resp.status.clone(),
        }
    }

    /// Value this reply sets for `name`, if it sets one.
    pub fn setting(&self, name: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn wake_request(resp: &RegisterNodeResponse) -> Option<WakeRequest> {
    let port = match u16::try_from(resp.wol_port) {
        Ok(port) => port,
        Err(_) => {
            warn!(port = resp.wol_port, "wake-on-LAN port out of range; ignoring wakeup");
            return None;
        }
    };

    let targets = resp
        .wol_mac_addresses
        .iter()
        .filter_map(|raw| match MacAddress::parse(raw) {
            Ok(mac) => Some(mac),
            Err(e) => {
                warn!("skipping wake-on-LAN target: {e}");
                None
            }
        })
        .collect();

    Some(WakeRequest {
        targets,
        host: resp.wol_host.clone(),
        port,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

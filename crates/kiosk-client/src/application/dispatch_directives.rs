//! DirectiveDispatcher: applies the side effects requested by one
//! registration (heartbeat) reply.
//!
//! The implicit guest login ("unlock") touches the session state machine and
//! is therefore handled by the session client before this dispatcher runs.
//! Everything else is applied here, in a fixed order:
//!
//! 1. power actions (shutdown, suspend, restart)
//! 2. wake-on-LAN packets
//! 3. stylesheet
//! 4. `session/*` settings and the logo image, then the banner-change check
//! 5. reservation status
//! 6. online/suspended status
//!
//! Each step only runs when its field is present.  Directives are not
//! deduplicated across polls.

use std::sync::Arc;

use kiosk_core::protocol::wol::MagicPacket;
use kiosk_core::{PowerAction, RemoteDirectives, StatusTracker, ClientStatus, BANNER_KEYS};
use tracing::{debug, info, warn};

use crate::application::events::UiEvent;
use crate::application::ports::{ConfigStore, EventSink, OsAction, OsActions, WakeOnLanSender};
use crate::application::settings::{
    session_key, IMAGES_LOGO, IMAGES_LOGO_HEIGHT, IMAGES_LOGO_WIDTH,
};

/// Applies [`RemoteDirectives`] through the injected capabilities.
pub struct DirectiveDispatcher {
    config: Arc<dyn ConfigStore>,
    os: Arc<dyn OsActions>,
    wol: Arc<dyn WakeOnLanSender>,
    events: Arc<dyn EventSink>,
}

impl DirectiveDispatcher {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        os: Arc<dyn OsActions>,
        wol: Arc<dyn WakeOnLanSender>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            os,
            wol,
            events,
        }
    }

    /// Applies every directive except unlock.  `status` is the caller's
    /// record of the last availability status.
    pub fn apply(&self, directives: &RemoteDirectives, status: &mut StatusTracker) {
        self.apply_power(&directives.power);
        self.apply_wake(directives);

        if let Some(css) = &directives.stylesheet {
            debug!(len = css.len(), "applying server stylesheet");
            self.events.emit(UiEvent::StyleSheetChanged(css.clone()));
        }

        if self.persist_settings(directives) {
            info!("banner or logo URL changed");
            self.events.emit(UiEvent::BannersChanged);
        }

        self.events
            .emit(UiEvent::ReservationStatus(directives.reserved_for.clone()));

        if let Some(raw) = &directives.status {
            match status.observe(raw) {
                Some(ClientStatus::Suspended) => {
                    info!("server suspended this client");
                    self.events.emit(UiEvent::ClientSuspended);
                }
                Some(ClientStatus::Online) => {
                    info!("server put this client back online");
                    self.events.emit(UiEvent::ClientOnline);
                }
                None => {}
            }
        }
    }

    fn apply_power(&self, actions: &[PowerAction]) {
        for &action in actions {
            info!(?action, "server requested power action");
            if action.requires_allow_close() {
                self.events.emit(UiEvent::AllowClose(true));
            }
            let os_action = match action {
                PowerAction::Shutdown => OsAction::Shutdown,
                PowerAction::Suspend => OsAction::Suspend,
                PowerAction::Restart => OsAction::Restart,
            };
            if let Err(e) = self.os.perform(&os_action) {
                warn!("power action {action:?} failed: {e}");
            }
        }
    }

    fn apply_wake(&self, directives: &RemoteDirectives) {
        let Some(wake) = &directives.wake else {
            return;
        };
        for mac in &wake.targets {
            let packet = MagicPacket::new(*mac);
            match self.wol.send(&packet, &wake.host, wake.port) {
                Ok(()) => debug!(%mac, host = %wake.host, port = wake.port, "magic packet sent"),
                Err(e) => debug!(%mac, "magic packet not sent: {e}"),
            }
        }
    }

    /// Writes the reply's `session/*` settings and logo image, and reports
    /// whether any banner or logo URL differs from the value stored before
    /// this poll.
    fn persist_settings(&self, directives: &RemoteDirectives) -> bool {
        let previous: Vec<Option<String>> = BANNER_KEYS
            .iter()
            .map(|name| self.config.get(&session_key(name)))
            .collect();
        let previous_logo = self.config.get(IMAGES_LOGO).unwrap_or_default();

        for (name, value) in &directives.settings {
            self.config.set(&session_key(name), value);
        }
        if let Some(logo) = &directives.logo {
            self.config.set(IMAGES_LOGO, &logo.url);
            self.config.set(IMAGES_LOGO_WIDTH, &logo.width);
            self.config.set(IMAGES_LOGO_HEIGHT, &logo.height);
        }
        if let Err(e) = self.config.sync() {
            warn!("could not persist session settings: {e}");
        }

        let logo_changed = directives
            .logo
            .as_ref()
            .is_some_and(|logo| logo.url != previous_logo);
        let banner_changed = BANNER_KEYS
            .iter()
            .zip(previous)
            .any(|(name, old)| match directives.setting(name) {
                Some(new) => new != old.unwrap_or_default(),
                None => false,
            });
        logo_changed || banner_changed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

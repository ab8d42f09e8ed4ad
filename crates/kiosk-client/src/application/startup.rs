//! Startup gate: decides whether the kiosk client should run for the
//! current OS user, and resets per-session settings before it does.
//!
//! A workstation may be shared between patrons and staff.  `node/onlyRunFor`
//! lists the OS accounts the kiosk is meant for; `node/onlyStopFor` lists
//! accounts it must stay out of the way for.  When the client bows out it can
//! start the regular desktop shell (`node/start_user_shell`) instead.

use tracing::info;

use crate::application::ports::{ConfigError, ConfigStore};
use crate::application::settings::{
    ClientSettings, SESSION_CLIENT_BEHAVIOR, SESSION_LOGGED_IN_USER,
    SESSION_RESERVATION_SHOW_USERNAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupDecision {
    Run,
    /// Do not start; launch `start_shell` first if configured.
    Exit {
        reason: &'static str,
        start_shell: Option<String>,
    },
}

/// Applies the `onlyRunFor` / `onlyStopFor` rules for `os_user`.
pub fn evaluate(settings: &ClientSettings, os_user: &str) -> StartupDecision {
    let listed = |names: &[String]| names.iter().any(|n| n == os_user);

    if !settings.only_run_for.is_empty() && !listed(&settings.only_run_for) {
        return StartupDecision::Exit {
            reason: "OS user is not listed in node/onlyRunFor",
            start_shell: settings.start_user_shell.clone(),
        };
    }

    if !settings.only_stop_for.is_empty() && listed(&settings.only_stop_for) {
        return StartupDecision::Exit {
            reason: "OS user is listed in node/onlyStopFor",
            start_shell: settings.start_user_shell.clone(),
        };
    }

    StartupDecision::Run
}

/// Clears settings that only make sense for a running session.
///
/// # Errors
///
/// Returns [`ConfigError`] if the store cannot be flushed.
pub fn reset_session_keys(store: &dyn ConfigStore) -> Result<(), ConfigError> {
    for key in [
        SESSION_CLIENT_BEHAVIOR,
        SESSION_RESERVATION_SHOW_USERNAME,
        SESSION_LOGGED_IN_USER,
    ] {
        store.set(key, "");
    }
    store.sync()?;
    info!("per-session settings reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::ServerEndpoint;
    use crate::infrastructure::storage::MemoryConfigStore;
    use kiosk_core::LogoutAction;

    fn settings(run_for: &[&str], stop_for: &[&str], shell: Option<&str>) -> ClientSettings {
        ClientSettings {
            node_name: None,
            location: String::new(),
            node_type: String::new(),
            age_limit: String::new(),
            logout_action: LogoutAction::None,
            only_run_for: run_for.iter().map(|s| s.to_string()).collect(),
            only_stop_for: stop_for.iter().map(|s| s.to_string()).collect(),
            start_user_shell: shell.map(str::to_string),
            server: ServerEndpoint {
                scheme: "http".into(),
                host: "localhost".into(),
                port: None,
            },
        }
    }

    #[test]
    fn test_no_lists_means_run() {
        assert_eq!(evaluate(&settings(&[], &[], None), "anyone"), StartupDecision::Run);
    }

    #[test]
    fn test_only_run_for_excludes_other_users() {
        // Arrange
        let s = settings(&["patron"], &[], Some("/usr/bin/startplasma-x11"));

        // Act
        let decision = evaluate(&s, "staff");

        // Assert
        assert_eq!(
            decision,
            StartupDecision::Exit {
                reason: "OS user is not listed in node/onlyRunFor",
                start_shell: Some("/usr/bin/startplasma-x11".to_string()),
            }
        );
        assert_eq!(evaluate(&s, "patron"), StartupDecision::Run);
    }

    #[test]
    fn test_only_stop_for_excludes_listed_users() {
        let s = settings(&[], &["admin", "staff"], None);
        assert!(matches!(
            evaluate(&s, "staff"),
            StartupDecision::Exit { start_shell: None, .. }
        ));
        assert_eq!(evaluate(&s, "patron"), StartupDecision::Run);
    }

    #[test]
    fn test_reset_session_keys_blanks_values() {
        // Arrange
        let store = MemoryConfigStore::new();
        store.set("session/LoggedInUser", "alice");
        store.set("session/ClientBehavior", "FCFS");
        store.set("session/LogoURL", "http://keep/me.png");

        // Act
        reset_session_keys(&store).unwrap();

        // Assert
        assert_eq!(store.get("session/LoggedInUser").as_deref(), Some(""));
        assert_eq!(store.get("session/ClientBehavior").as_deref(), Some(""));
        assert_eq!(store.get("session/ReservationShowUsername").as_deref(), Some(""));
        assert_eq!(store.get("session/LogoURL").as_deref(), Some("http://keep/me.png"));
        assert_eq!(store.sync_count(), 1);
    }
}

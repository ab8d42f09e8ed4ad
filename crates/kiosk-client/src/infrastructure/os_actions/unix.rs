//! Command table for Linux and other Unix desktops.
//!
//! `sudo` must be allowed to run `shutdown` and `reboot` for the kiosk
//! account without a password.  Logging out of the desktop tries every
//! supported desktop environment in turn.

use super::CommandLine;
use crate::application::ports::OsAction;

pub fn commands(action: &OsAction) -> Vec<CommandLine> {
    match action {
        OsAction::Shutdown => vec![CommandLine::new("sudo", &["shutdown", "0"])],
        OsAction::Restart => vec![CommandLine::new("sudo", &["reboot"])],
        OsAction::Suspend => vec![CommandLine::new("systemctl", &["suspend", "-i"])],
        OsAction::EndDesktopSession => vec![
            // KDE
            CommandLine::new(
                "qdbus",
                &[
                    "org.kde.ksmserver",
                    "/KSMServer",
                    "org.kde.KSMServerInterface.logout",
                    "-0",
                    "-1",
                    "-1",
                ],
            ),
            // GNOME
            CommandLine::new("gnome-session-save", &["--kill", "--silent"]),
            // Unity
            CommandLine::new("gnome-session-quit", &["--no-prompt"]),
            // XFCE
            CommandLine::program("/usr/bin/xfce4-session-logout"),
            // MATE
            CommandLine::new("mate-session-save", &["--force-logout"]),
        ],
        OsAction::RunScript(path) | OsAction::StartShell(path) => vec![CommandLine::program(path)],
        OsAction::DesktopStartup
        | OsAction::DesktopSessionOpened
        | OsAction::DesktopSessionClosed => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_commands() {
        assert_eq!(
            commands(&OsAction::Shutdown),
            vec![CommandLine::new("sudo", &["shutdown", "0"])]
        );
        assert_eq!(
            commands(&OsAction::Restart),
            vec![CommandLine::new("sudo", &["reboot"])]
        );
        assert_eq!(
            commands(&OsAction::Suspend),
            vec![CommandLine::new("systemctl", &["suspend", "-i"])]
        );
    }

    #[test]
    fn test_desktop_logout_covers_every_environment() {
        let programs: Vec<String> = commands(&OsAction::EndDesktopSession)
            .into_iter()
            .map(|c| c.program)
            .collect();
        assert_eq!(
            programs,
            vec![
                "qdbus",
                "gnome-session-save",
                "gnome-session-quit",
                "/usr/bin/xfce4-session-logout",
                "mate-session-save",
            ]
        );
    }

    #[test]
    fn test_script_path_with_spaces_kept_whole() {
        assert_eq!(
            commands(&OsAction::RunScript("/opt/kiosk scripts/on login.sh".into())),
            vec![CommandLine::program("/opt/kiosk scripts/on login.sh")]
        );
    }

    #[test]
    fn test_desktop_lockdown_is_a_no_op() {
        assert!(commands(&OsAction::DesktopStartup).is_empty());
        assert!(commands(&OsAction::DesktopSessionOpened).is_empty());
        assert!(commands(&OsAction::DesktopSessionClosed).is_empty());
    }
}

//! Command table for Windows.
//!
//! The desktop shell (`explorer.exe`) is stopped while nobody is logged in
//! and restarted for the patron's session.  The `windows\on_*.exe` helpers
//! shipped next to the client lock down or release the desktop.

use super::CommandLine;
use crate::application::ports::OsAction;

fn kill_shell() -> CommandLine {
    CommandLine::new("taskkill", &["/f", "/im", "explorer.exe"])
}

pub fn commands(action: &OsAction) -> Vec<CommandLine> {
    match action {
        OsAction::Shutdown => vec![CommandLine::new("shutdown", &["-s", "-f", "-t", "0"])],
        OsAction::Restart => vec![CommandLine::new("shutdown", &["-r", "-f", "-t", "0"])],
        OsAction::Suspend => vec![CommandLine::new(
            "rundll32.exe",
            &["powrprof.dll,SetSuspendState", "0,1,0"],
        )],
        OsAction::EndDesktopSession => vec![CommandLine::new("shutdown", &["-l", "-f"])],
        OsAction::RunScript(path) | OsAction::StartShell(path) => vec![CommandLine::program(path)],
        OsAction::DesktopStartup => vec![
            kill_shell(),
            CommandLine::program("windows/on_startup.exe"),
        ],
        OsAction::DesktopSessionOpened => vec![
            CommandLine::program("c:/windows/explorer.exe"),
            CommandLine::program("windows/on_login.exe"),
        ],
        OsAction::DesktopSessionClosed => vec![
            kill_shell(),
            CommandLine::program("windows/on_logout.exe"),
        ],
    }
}

//! Operating-system side effects: power control, desktop session control,
//! and launching configured scripts.
//!
//! The application asks for an abstract [`OsAction`]; this module turns it
//! into the command lines for the current platform and launches them
//! detached.  The tables themselves live in [`unix`] and [`windows`] as plain
//! functions so both can be tested on any host.
//!
//! Power and logout commands assume the kiosk account may run them without a
//! password prompt (for example through a `sudoers` rule on Linux).

pub mod mock;
pub mod unix;
pub mod windows;

use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::application::ports::{OsAction, OsActionError, OsActions};

/// One program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// A program path run without arguments.  Paths containing spaces are
    /// kept whole.
    pub fn program(path: &str) -> Self {
        Self {
            program: path.to_string(),
            args: Vec::new(),
        }
    }
}

/// Command lines for `action` on the platform this binary was built for.
pub fn platform_commands(action: &OsAction) -> Vec<CommandLine> {
    if cfg!(target_os = "windows") {
        windows::commands(action)
    } else {
        unix::commands(action)
    }
}

/// Launches the platform commands for each action.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOsActions;

impl SystemOsActions {
    pub fn new() -> Self {
        Self
    }
}

impl OsActions for SystemOsActions {
    /// Starts every command for `action`.  Succeeds if at least one of them
    /// launched: desktop logout tries several desktop environments and all
    /// but one are expected to be missing.
    fn perform(&self, action: &OsAction) -> Result<(), OsActionError> {
        let commands = platform_commands(action);
        if commands.is_empty() {
            debug!(?action, "nothing to run on this platform");
            return Ok(());
        }

        let mut launched = false;
        let mut last_error = None;
        for command in &commands {
            match spawn_detached(command) {
                Ok(()) => launched = true,
                Err(e) => {
                    debug!("{e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !launched => {
                warn!(?action, "no command for OS action could be started");
                Err(e)
            }
            _ => {
                info!(?action, "OS action started");
                Ok(())
            }
        }
    }
}

fn spawn_detached(command: &CommandLine) -> Result<(), OsActionError> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OsActionError::Spawn {
            program: command.program.clone(),
            source,
        })?;
    debug!(program = %command.program, pid = child.id(), "launched");

    // Reap the child so it does not linger as a zombie.
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let result = spawn_detached(&CommandLine::program("/nonexistent/kiosk-test-program"));
        assert!(matches!(
            result,
            Err(OsActionError::Spawn { program, .. }) if program == "/nonexistent/kiosk-test-program"
        ));
    }

    #[test]
    fn test_run_script_with_missing_program_fails() {
        let result = SystemOsActions::new()
            .perform(&OsAction::RunScript("/nonexistent/on-login.sh".into()));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_script_launches_existing_program() {
        let result = SystemOsActions::new().perform(&OsAction::RunScript("true".into()));
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_actions_without_commands_succeed() {
        let result = SystemOsActions::new().perform(&OsAction::DesktopSessionOpened);
        assert!(result.is_ok());
    }
}

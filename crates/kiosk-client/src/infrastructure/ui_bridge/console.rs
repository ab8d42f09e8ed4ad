//! Line-oriented command input for the headless binary.
//!
//! Commands, one per line on standard input:
//!
//! ```text
//! login <username> [password]
//! logout
//! ack <username>        acknowledge a reservation
//! clear                 clear the pending staff message
//! ```
//!
//! Blank lines are ignored; anything else is reported and skipped.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::events::UiCommand;
use crate::application::session_client::ClientEvent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command {0:?}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one input line.  `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb, rest.as_slice()) {
        ("login", [username, password]) => UiCommand::AttemptLogin {
            username: username.to_string(),
            password: password.to_string(),
        },
        // Guest logins and passwordless mode send an empty password.
        ("login", [username]) => UiCommand::AttemptLogin {
            username: username.to_string(),
            password: String::new(),
        },
        ("login", _) => return Err(ConsoleError::Usage("login <username> [password]")),
        ("logout", []) => UiCommand::AttemptLogout,
        ("logout", _) => return Err(ConsoleError::Usage("logout")),
        ("ack", [username]) => UiCommand::AcknowledgeReservation(username.to_string()),
        ("ack", _) => return Err(ConsoleError::Usage("ack <username>")),
        ("clear", []) => UiCommand::ClearMessage,
        ("clear", _) => return Err(ConsoleError::Usage("clear")),
        (other, _) => return Err(ConsoleError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Reads commands from standard input and posts them to the client until
/// input ends or the client stops.
pub fn spawn_console(tx: UnboundedSender<ClientEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("console input closed");
                    break;
                }
                Err(e) => {
                    warn!("console read failed: {e}");
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(ClientEvent::Command(command)).is_err() {
                        debug!("client stopped; console exiting");
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{e}"),
            }
        }
    })
}

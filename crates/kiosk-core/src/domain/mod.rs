//! Domain entities for the kiosk session client.
//!
//! Pure types and rules with no sockets, files or processes.  Code in the
//! client crate owns the side effects and calls into these types to decide
//! what should happen.
//!
//! # What lives here? (for beginners)
//!
//! - **`node`** – who this workstation is.
//! - **`session`** – the login/logout state machine and the credentials it
//!   guards.
//! - **`status`** – the server-directed online/suspended overlay.
//! - **`directive`** – the typed set of instructions from one heartbeat.
//! - **`print_job`** – how a spooled file is marked as taken.

pub mod directive;
pub mod node;
pub mod print_job;
pub mod session;
pub mod status;

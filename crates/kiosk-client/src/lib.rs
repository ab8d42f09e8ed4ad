//! kiosk-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does kiosk-client do? (for beginners)
//!
//! The client runs on a public-access workstation and keeps it in step with
//! a central management server.  The server decides who may use the machine
//! and for how long; the client enforces it:
//!
//! 1. Every 10 seconds it registers the node with the server.  The reply may
//!    unlock the station for a guest, shut it down, wake other machines,
//!    change the branding, or mark the station reserved or suspended.
//! 2. A patron logs in with a username and password.  While the session is
//!    active the client polls the server for the remaining time and for
//!    staff messages, and logs the patron out when time runs out or staff
//!    end the session.
//! 3. Print jobs dropped into per-printer spool directories are claimed and
//!    uploaded to the server, retrying until they get through.
//! 4. A separate check reports whether the wider internet is reachable.
//!
//! All OS and network side effects go through the traits in
//! [`application::ports`]; [`infrastructure`] provides the real
//! implementations.

/// Application layer: use cases for the client.
pub mod application;

/// Infrastructure layer: OS adapters, network, storage, and UI bridge.
pub mod infrastructure;

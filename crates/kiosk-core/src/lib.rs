//! # kiosk-core
//!
//! Shared library for the kiosk session client containing the management
//! API wire model, the session domain types, and the wake-on-LAN packet
//! format.
//!
//! It has no dependencies on OS APIs, UI frameworks, or network sockets, so
//! everything here can be unit-tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! A kiosk client runs on a public workstation.  It talks to a management
//! server over plain HTTP `GET` requests and learns what to do from the JSON
//! replies: who may log in, how much time they have left, whether the machine
//! should shut down, which banners to show, and so on.
//!
//! This crate (`kiosk-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – What goes over the wire.  Requests are an `action`
//!   plus query items; replies are decoded into typed documents that accept
//!   the server's loose JSON (flags as `1`/`"1"`/`true`, numbers as strings).
//!
//! - **`domain`** – Pure business logic: the session state machine, the
//!   online/suspended tracker, the directive set extracted from a heartbeat,
//!   and the print-job claim naming rule.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `kiosk_core::SessionMachine` instead of `kiosk_core::domain::session::SessionMachine`.
pub use domain::directive::{
    LogoImage, PowerAction, RemoteDirectives, Unlock, WakeRequest, BANNER_KEYS,
};
pub use domain::node::NodeIdentity;
pub use domain::print_job::{claimed_path, is_claimed, DeliveryState, CLAIM_SUFFIX};
pub use domain::session::{
    Credentials, LogoutAction, SessionError, SessionMachine, SessionState,
};
pub use domain::status::{ClientStatus, StatusTracker};
pub use protocol::codec::{parse_response, ProtocolError};
pub use protocol::request::{Action, ApiRequest};
pub use protocol::wol::{MacAddress, MagicPacket};

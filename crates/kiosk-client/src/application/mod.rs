//! Application layer use cases for the kiosk client.
//!
//! # What use cases does the client have?
//!
//! - **`session_client`** – The session life cycle (login, logout, forced
//!   logout) and the four periodic polls: registration, connectivity,
//!   user data, and print upload.  Runs as a single-consumer actor driven by
//!   timer ticks, UI commands, and request replies.
//!
//! - **`dispatch_directives`** – Applies what a registration reply asks for:
//!   power actions, wake-on-LAN, stylesheet, persisted display settings,
//!   reservation and availability status.
//!
//! - **`upload_print_jobs`** – Claims spooled print files by renaming them
//!   and prepares their multipart uploads.
//!
//! - **`startup`** – Decides whether the client runs for the current OS user
//!   and clears per-session settings left over from a previous run.
//!
//! - **`connectivity`** – Parses the connectivity-check URL list and picks a
//!   target.
//!
//! Everything the use cases need from the outside world is described by the
//! traits in **`ports`** and injected at construction time.

pub mod connectivity;
pub mod dispatch_directives;
pub mod events;
pub mod ports;
pub mod session_client;
pub mod settings;
pub mod startup;
pub mod upload_print_jobs;

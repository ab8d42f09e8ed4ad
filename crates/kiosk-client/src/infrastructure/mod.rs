//! Infrastructure layer for the kiosk client.
//!
//! Contains the OS-facing adapters that implement the application's ports:
//! HTTP and UDP networking, the settings file, process launching, timers, and
//! the UI bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `kiosk_core`, but MUST NOT be imported by the `application` or domain
//! layers (test modules excepted).
//!
//! # Sub-modules
//!
//! - **`network`** – `HttpTransport` (reqwest) for the management API,
//!   connectivity probes and print uploads; `UdpWakeSender` for
//!   wake-on-LAN.  Scripted doubles live in `network::mock`.
//!
//! - **`storage`** – `TomlConfigStore`, the settings file, and
//!   `MemoryConfigStore` for tests.
//!
//! - **`os_actions`** – `SystemOsActions`, which turns abstract OS actions into
//!   platform command lines and launches them detached.  A recording double
//!   lives in `os_actions::mock`.
//!
//! - **`scheduler`** – `TokioScheduler` interval timers and a
//!   `ManualScheduler` for tests.
//!
//! - **`ui_bridge`** – event sink, JSON event stream, and the console command
//!   reader used by the headless binary.
//!
//! - **`node_info`** – hostname, IPv4, MAC, and OS-user discovery.

pub mod network;
pub mod node_info;
pub mod os_actions;
pub mod scheduler;
pub mod storage;
pub mod ui_bridge;

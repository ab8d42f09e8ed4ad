//! Storage infrastructure: the persistent settings store.
//!
//! - **`config`** – `TomlConfigStore`, the on-disk store used by the binary.
//!   Each key group (`node`, `server`, `session`, `printers`, `scriptlogin`,
//!   `scriptlogout`) is a top-level TOML table.
//! - **`memory`** – `MemoryConfigStore`, an in-memory store for tests.
//!
//! Both implement the application's `ConfigStore` port, so the session logic
//! never knows which one it is talking to.

pub mod config;
pub mod memory;

pub use config::{config_file_path, TomlConfigStore};
pub use memory::MemoryConfigStore;

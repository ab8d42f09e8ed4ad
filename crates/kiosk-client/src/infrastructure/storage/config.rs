//! TOML-based persistence for the client's settings.
//!
//! Reads and writes the settings file in the platform-appropriate location:
//! - Windows:  `%APPDATA%\KioskClient\config.toml`
//! - Linux:    `~/.config/kiosk-client/config.toml`
//! - macOS:    `~/Library/Application Support/KioskClient/config.toml`
//!
//! # Key layout (for beginners)
//!
//! The application addresses settings as `group/name` strings.  In the file
//! each group is a TOML table and each name a key inside it:
//!
//! ```toml
//! [server]
//! host = "kiosk.example.org"
//! port = 443
//!
//! [session]
//! LogoURL = "https://kiosk.example.org/logo.png"
//! ```
//!
//! `server/port` above reads back as the string `"443"`: the store is
//! untyped, and the typed view lives in `application::settings`.  Values the
//! client writes are always stored as TOML strings.
//!
//! Writes go to an in-memory copy of the document and reach the disk only on
//! [`ConfigStore::sync`].

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use toml::{Table, Value};
use tracing::debug;

use crate::application::ports::{ConfigError, ConfigStore};

// ── Store ─────────────────────────────────────────────────────────────────────

/// Settings file backed by a TOML document.
#[derive(Debug)]
pub struct TomlConfigStore {
    path: PathBuf,
    table: Mutex<Table>,
}

impl TomlConfigStore {
    /// Loads the settings file at `path`.  A file that does not exist yet
    /// yields an empty store; it is created on the first `sync`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not found",
    /// and [`ConfigError::Parse`] if the TOML is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let table = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<Table>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file yet, starting empty");
                Table::new()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Opens the settings file in the platform config directory.
    ///
    /// # Errors
    ///
    /// See [`config_file_path`] and [`TomlConfigStore::open`].
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(config_file_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for TomlConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        let (group, name) = split_key(key);
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let value = match group {
            Some(group) => table.get(group)?.as_table()?.get(name)?,
            None => table.get(name)?,
        };
        Some(value_text(value))
    }

    fn set(&self, key: &str, value: &str) {
        let (group, name) = split_key(key);
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let target = match group {
            Some(group) => {
                let entry = table
                    .entry(group.to_string())
                    .or_insert_with(|| Value::Table(Table::new()));
                if !entry.is_table() {
                    *entry = Value::Table(Table::new());
                }
                match entry.as_table_mut() {
                    Some(target) => target,
                    None => return,
                }
            }
            None => &mut *table,
        };
        target.insert(name.to_string(), Value::String(value.to_string()));
    }

    fn keys_in_group(&self, group: &str) -> Vec<String> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = table
            .get(group)
            .and_then(Value::as_table)
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Writes the document back to disk, creating the directory if needed.
    fn sync(&self) -> Result<(), ConfigError> {
        let content = {
            let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            toml::to_string_pretty(&*table)?
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('/') {
        Some((group, name)) => (Some(group), name),
        None => (None, key),
    }
}

/// Textual form of a stored value.  Strings are returned without quotes.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Resolves the platform config directory including the application
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KioskClient"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("KioskClient")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("kiosk-client"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("kiosk_cfg_{}", Uuid::new_v4()))
            .join("config.toml")
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_open_missing_file_yields_empty_store() {
        // Arrange
        let path = scratch_file();

        // Act
        let store = TomlConfigStore::open(&path).unwrap();

        // Assert
        assert_eq!(store.get("server/host"), None);
        assert!(store.keys_in_group("printers").is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_reads_non_string_values_as_text() {
        // Arrange
        let path = scratch_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "[server]\nhost = \"kiosk.example.org\"\nport = 443\n\n[scriptlogin]\nenable = true\n",
        )
        .unwrap();

        // Act
        let store = TomlConfigStore::open(&path).unwrap();

        // Assert
        assert_eq!(store.get("server/host").as_deref(), Some("kiosk.example.org"));
        assert_eq!(store.get("server/port").as_deref(), Some("443"));
        assert_eq!(store.get("scriptlogin/enable").as_deref(), Some("true"));
        cleanup(&path);
    }

    #[test]
    fn test_sync_writes_and_reopen_reads_back() {
        // Arrange
        let path = scratch_file();
        let store = TomlConfigStore::open(&path).unwrap();
        store.set("session/LoggedInUser", "alice");
        store.set("printers/Front Desk", "/var/spool/kiosk/front");

        // Act
        store.sync().unwrap();
        let reopened = TomlConfigStore::open(&path).unwrap();

        // Assert
        assert_eq!(reopened.get("session/LoggedInUser").as_deref(), Some("alice"));
        assert_eq!(reopened.keys_in_group("printers"), vec!["Front Desk"]);
        cleanup(&path);
    }

    #[test]
    fn test_set_is_visible_before_sync() {
        let path = scratch_file();
        let store = TomlConfigStore::open(&path).unwrap();
        store.set("session/LogoURL", "http://srv/logo.png");
        assert_eq!(store.get("session/LogoURL").as_deref(), Some("http://srv/logo.png"));
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        // Arrange
        let path = scratch_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[server\nhost = ").unwrap();

        // Act
        let result = TomlConfigStore::open(&path);

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert_eq!(path.file_name().unwrap(), "config.toml");
        }
    }
}

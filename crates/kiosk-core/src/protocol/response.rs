//! Typed response documents returned by the management API.
//!
//! The server is loosely typed: flags may arrive as `true`, `1` or `"1"`,
//! counts as numbers or numeric strings, and unset display settings as
//! `null`.  The `lenient` helpers below normalise those shapes while still
//! rejecting values that cannot mean anything (for example `"units": "abc"`),
//! which turns the whole body into a protocol error.
//!
//! Unknown fields are ignored.  Optional fields that are absent stay `None`,
//! which callers read as "no change".

use serde::Deserialize;

/// Reply to `action=register_node` (the heartbeat).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegisterNodeResponse {
    #[serde(deserialize_with = "lenient::flag")]
    pub registered: bool,

    #[serde(deserialize_with = "lenient::flag")]
    pub unlock: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub username: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub minutes: i64,

    #[serde(deserialize_with = "lenient::flag")]
    pub shutdown: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub suspend: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub restart: bool,

    #[serde(deserialize_with = "lenient::flag")]
    pub wakeup: bool,
    #[serde(deserialize_with = "lenient::text_list")]
    pub wol_mac_addresses: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub wol_host: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub wol_port: i64,

    #[serde(rename = "ClientStyleSheet", deserialize_with = "lenient::optional_text")]
    pub client_style_sheet: Option<String>,

    #[serde(rename = "ClientBehavior", deserialize_with = "lenient::optional_text")]
    pub client_behavior: Option<String>,
    #[serde(rename = "ReservationShowUsername", deserialize_with = "lenient::optional_text")]
    pub reservation_show_username: Option<String>,
    #[serde(rename = "EnableClientSessionLocking", deserialize_with = "lenient::optional_text")]
    pub enable_client_session_locking: Option<String>,
    #[serde(rename = "EnableClientPasswordlessMode", deserialize_with = "lenient::optional_text")]
    pub enable_client_passwordless_mode: Option<String>,
    #[serde(rename = "TermsOfService", deserialize_with = "lenient::optional_text")]
    pub terms_of_service: Option<String>,
    #[serde(rename = "TermsOfServiceDetails", deserialize_with = "lenient::optional_text")]
    pub terms_of_service_details: Option<String>,

    #[serde(rename = "BannerTopURL", deserialize_with = "lenient::optional_text")]
    pub banner_top_url: Option<String>,
    #[serde(rename = "BannerTopWidth", deserialize_with = "lenient::optional_text")]
    pub banner_top_width: Option<String>,
    #[serde(rename = "BannerTopHeight", deserialize_with = "lenient::optional_text")]
    pub banner_top_height: Option<String>,
    #[serde(rename = "BannerBottomURL", deserialize_with = "lenient::optional_text")]
    pub banner_bottom_url: Option<String>,
    #[serde(rename = "BannerBottomWidth", deserialize_with = "lenient::optional_text")]
    pub banner_bottom_width: Option<String>,
    #[serde(rename = "BannerBottomHeight", deserialize_with = "lenient::optional_text")]
    pub banner_bottom_height: Option<String>,
    #[serde(rename = "LogoURL", deserialize_with = "lenient::optional_text")]
    pub logo_url: Option<String>,
    /// Logo image for the login screen, kept under `images/*` rather than
    /// `session/*`.
    #[serde(rename = "Logo", deserialize_with = "lenient::optional_text")]
    pub logo: Option<String>,
    #[serde(rename = "LogoWidth", deserialize_with = "lenient::optional_text")]
    pub logo_width: Option<String>,
    #[serde(rename = "LogoHeight", deserialize_with = "lenient::optional_text")]
    pub logo_height: Option<String>,

    #[serde(rename = "inactivityLogout", deserialize_with = "lenient::optional_text")]
    pub inactivity_logout: Option<String>,
    #[serde(rename = "inactivityWarning", deserialize_with = "lenient::optional_text")]
    pub inactivity_warning: Option<String>,
    #[serde(rename = "InternetConnectivityURLs", deserialize_with = "lenient::optional_text")]
    pub internet_connectivity_urls: Option<String>,
    #[serde(rename = "ClientTimeNotificationFrequency", deserialize_with = "lenient::optional_text")]
    pub client_time_notification_frequency: Option<String>,
    #[serde(rename = "ClientTimeWarningThreshold", deserialize_with = "lenient::optional_text")]
    pub client_time_warning_threshold: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub reserved_for: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
}

impl RegisterNodeResponse {
    /// Settings the client persists under `session/*`, keyed by their store
    /// name.  Only fields present in the response are listed.
    pub fn session_settings(&self) -> Vec<(&'static str, String)> {
        let fields: [(&'static str, &Option<String>); 20] = [
            ("ClientBehavior", &self.client_behavior),
            ("ReservationShowUsername", &self.reservation_show_username),
            ("EnableClientSessionLocking", &self.enable_client_session_locking),
            ("EnableClientPasswordlessMode", &self.enable_client_passwordless_mode),
            ("TermsOfService", &self.terms_of_service),
            ("TermsOfServiceDetails", &self.terms_of_service_details),
            ("BannerTopURL", &self.banner_top_url),
            ("BannerTopWidth", &self.banner_top_width),
            ("BannerTopHeight", &self.banner_top_height),
            ("BannerBottomURL", &self.banner_bottom_url),
            ("BannerBottomWidth", &self.banner_bottom_width),
            ("BannerBottomHeight", &self.banner_bottom_height),
            ("LogoURL", &self.logo_url),
            ("LogoWidth", &self.logo_width),
            ("LogoHeight", &self.logo_height),
            ("inactivityLogout", &self.inactivity_logout),
            ("inactivityWarning", &self.inactivity_warning),
            ("InternetConnectivityURLs", &self.internet_connectivity_urls),
            ("ClientTimeNotificationFrequency", &self.client_time_notification_frequency),
            ("ClientTimeWarningThreshold", &self.client_time_warning_threshold),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
            .collect()
    }
}

/// Reply to `action=login`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoginResponse {
    #[serde(deserialize_with = "lenient::flag")]
    pub authenticated: bool,
    #[serde(deserialize_with = "lenient::integer")]
    pub units: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub hold_items_count: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub error: String,
}

/// Reply to `action=logout`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogoutResponse {
    #[serde(deserialize_with = "lenient::flag")]
    pub logged_out: bool,
}

/// Server-side view of the signed-in user, from `action=get_user_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatus {
    LoggedIn,
    LoggedOut,
    Kicked,
    Other(String),
}

impl From<&str> for UserStatus {
    fn from(value: &str) -> Self {
        match value {
            "Logged in" => UserStatus::LoggedIn,
            "Logged out" => UserStatus::LoggedOut,
            "Kicked" => UserStatus::Kicked,
            other => UserStatus::Other(other.to_string()),
        }
    }
}

/// Reply to `action=get_user_data`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserDataResponse {
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(deserialize_with = "lenient::text_list")]
    pub messages: Vec<String>,
    #[serde(deserialize_with = "lenient::optional_integer")]
    pub units: Option<i64>,
}

impl UserDataResponse {
    pub fn user_status(&self) -> UserStatus {
        UserStatus::from(self.status.as_str())
    }
}

/// Deserializers that accept the loose scalar shapes the server emits.
mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn as_text(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        }
    }

    fn as_integer<E: serde::de::Error>(value: Value) -> Result<i64, E> {
        match value {
            Value::Null => Ok(0),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| E::custom(format!("integer out of range: {n}"))),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed
                    .parse::<i64>()
                    .or_else(|_| trimmed.parse::<f64>().map(|f| f.trunc() as i64))
                    .map_err(|_| E::custom(format!("not an integer: {s:?}")))
            }
            other => Err(E::custom(format!("not an integer: {other}"))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(truthy(&Value::deserialize(d)?))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(as_text(Value::deserialize(d)?))
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Some(as_text(Value::deserialize(d)?)))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        as_integer(Value::deserialize(d)?)
    }

    pub fn optional_integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            other => as_integer(other).map(Some),
        }
    }

    pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => Ok(items.into_iter().map(as_text).collect()),
            Value::String(s) => Ok(vec![s]),
            other => Err(D::Error::custom(format!("expected a list, got {other}"))),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_accepts_typed_fields() {
        // Arrange
        let body = r#"{"authenticated": true, "units": 45, "hold_items_count": 2}"#;

        // Act
        let resp: LoginResponse = serde_json::from_str(body).unwrap();

        // Assert
        assert!(resp.authenticated);
        assert_eq!(resp.units, 45);
        assert_eq!(resp.hold_items_count, 2);
        assert_eq!(resp.error, "");
    }

    #[test]
    fn test_login_response_accepts_stringly_numbers_and_flags() {
        let body = r#"{"authenticated": "1", "units": "30", "hold_items_count": null}"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert!(resp.authenticated);
        assert_eq!(resp.units, 30);
        assert_eq!(resp.hold_items_count, 0);
    }

    #[test]
    fn test_login_response_rejects_garbage_units() {
        let body = r#"{"authenticated": true, "units": "lots"}"#;
        assert!(serde_json::from_str::<LoginResponse>(body).is_err());
    }

    #[test]
    fn test_register_response_defaults_when_fields_absent() {
        // Arrange / Act
        let resp: RegisterNodeResponse = serde_json::from_str("{}").unwrap();

        // Assert
        assert!(!resp.registered);
        assert!(!resp.shutdown);
        assert_eq!(resp.status, None);
        assert!(resp.session_settings().is_empty());
    }

    #[test]
    fn test_register_response_session_settings_only_lists_present_fields() {
        // Arrange
        let body = r#"{
            "BannerTopURL": "http://x/top.png",
            "BannerTopWidth": 800,
            "LogoURL": null,
            "SomethingNew": "ignored"
        }"#;

        // Act
        let resp: RegisterNodeResponse = serde_json::from_str(body).unwrap();
        let settings = resp.session_settings();

        // Assert
        assert_eq!(
            settings,
            vec![
                ("BannerTopURL", "http://x/top.png".to_string()),
                ("BannerTopWidth", "800".to_string()),
                ("LogoURL", String::new()),
            ]
        );
    }

    #[test]
    fn test_register_response_numeric_flags() {
        let body = r#"{"shutdown": 0, "restart": 1, "suspend": "0", "wakeup": "true"}"#;
        let resp: RegisterNodeResponse = serde_json::from_str(body).unwrap();
        assert!(!resp.shutdown);
        assert!(resp.restart);
        assert!(!resp.suspend);
        assert!(resp.wakeup);
    }

    #[test]
    fn test_user_data_response_parses_status_and_messages() {
        // Arrange
        let body = r#"{"status":"Logged in","units":12,"messages":["one","two"]}"#;

        // Act
        let resp: UserDataResponse = serde_json::from_str(body).unwrap();

        // Assert
        assert_eq!(resp.user_status(), UserStatus::LoggedIn);
        assert_eq!(resp.messages, vec!["one", "two"]);
        assert_eq!(resp.units, Some(12));
    }

    #[test]
    fn test_user_data_response_missing_units_is_none() {
        let resp: UserDataResponse = serde_json::from_str(r#"{"status":"Kicked"}"#).unwrap();
        assert_eq!(resp.units, None);
        assert_eq!(resp.user_status(), UserStatus::Kicked);
    }

    #[test]
    fn test_user_status_unknown_value_is_preserved() {
        assert_eq!(
            UserStatus::from("Paused"),
            UserStatus::Other("Paused".to_string())
        );
    }
}

//! Optional settings file.
//!
//! `config.toml` lives next to `credentials.json` in the application
//! directory. It is only ever read; every key has a default.
//!
//! ```toml
//! [oauth]
//! scopes = ["https://www.googleapis.com/auth/calendar.readonly"]
//! state = "state-token"
//! timeout = 30
//!
//! [calendar]
//! api_base = "https://www.googleapis.com/calendar/v3"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use timetracker_core::AppDir;
use timetracker_google::{ClientCredentials, OAuthConfig};

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OAuth request settings.
    pub oauth: OAuthSettings,

    /// Calendar API settings.
    pub calendar: CalendarSettings,
}

/// `[oauth]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    /// Scopes requested during authorization.
    pub scopes: Vec<String>,

    /// `state` parameter of the authorization URL.
    pub state: String,

    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

/// `[calendar]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Base URL of the Calendar API.
    pub api_base: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            api_base: OAuthConfig::DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            scopes: vec![OAuthConfig::DEFAULT_SCOPE.to_string()],
            state: OAuthConfig::DEFAULT_STATE.to_string(),
            timeout: OAuthConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Loads `config.toml` from the application directory, falling back to
    /// defaults when the file does not exist.
    pub fn load(dir: &AppDir) -> Result<Self, String> {
        let path = dir.settings_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Builds the OAuth client configuration for `credentials`.
    pub fn to_oauth_config(&self, credentials: ClientCredentials) -> OAuthConfig {
        OAuthConfig::new(credentials)
            .with_scopes(self.oauth.scopes.clone())
            .with_state(self.oauth.state.clone())
            .with_timeout(Duration::from_secs(self.oauth.timeout))
            .with_api_base(self.calendar.api_base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("id.apps.googleusercontent.com", "secret")
    }

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load(&AppDir::new(tmp.path())).unwrap();
        assert_eq!(settings.oauth, OAuthSettings::default());

        let config = settings.to_oauth_config(credentials());
        assert_eq!(config.scopes, vec!["https://www.googleapis.com/auth/calendar".to_string()]);
        assert_eq!(config.state, "state-token");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_base, "https://www.googleapis.com/calendar/v3");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = AppDir::new(tmp.path());
        std::fs::write(
            dir.settings_path(),
            "[oauth]\n\
             scopes = [\"https://www.googleapis.com/auth/calendar.readonly\"]\n\
             timeout = 5\n",
        )
        .unwrap();

        let settings = Settings::load(&dir).unwrap();
        assert_eq!(
            settings.oauth.scopes,
            vec!["https://www.googleapis.com/auth/calendar.readonly".to_string()]
        );
        assert_eq!(settings.oauth.timeout, 5);
        assert_eq!(settings.oauth.state, "state-token");
        assert_eq!(settings.calendar, CalendarSettings::default());
    }

    #[test]
    fn calendar_api_base_override() {
        let settings: Settings =
            toml::from_str("[calendar]\napi_base = \"http://127.0.0.1:9000/v3\"\n").unwrap();
        let config = settings.to_oauth_config(credentials());
        assert_eq!(config.api_base, "http://127.0.0.1:9000/v3");
        assert_eq!(config.state, "state-token");
    }

    #[test]
    fn empty_file_is_valid() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.oauth, OAuthSettings::default());
    }

    #[test]
    fn malformed_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = AppDir::new(tmp.path());
        std::fs::write(dir.settings_path(), "[oauth\n").unwrap();

        let err = Settings::load(&dir).unwrap_err();
        assert!(err.contains("failed to parse"));
    }
}

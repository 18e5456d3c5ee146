//! OAuth client configuration.

use std::time::Duration;

use crate::credentials::ClientCredentials;
use crate::error::{GoogleError, GoogleResult};

/// Configuration for the OAuth client and the Calendar API client.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Client material read from `credentials.json`.
    pub credentials: ClientCredentials,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://www.googleapis.com/auth/calendar"]`.
    pub scopes: Vec<String>,

    /// Opaque `state` value sent with the authorization request.
    pub state: String,

    /// Request timeout for every HTTP call.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Base URL of the Calendar API.
    pub api_base: String,
}

impl OAuthConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default scope: full calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar";

    /// Default `state` parameter.
    pub const DEFAULT_STATE: &'static str = "state-token";

    /// Google Calendar API v3.
    pub const DEFAULT_API_BASE: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Creates a configuration with the default scope, state and timeout.
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            credentials,
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            state: Self::DEFAULT_STATE.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("gcal-time-tracker/{}", env!("CARGO_PKG_VERSION")),
            api_base: Self::DEFAULT_API_BASE.to_string(),
        }
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the `state` parameter.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the Calendar API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GoogleResult<()> {
        self.credentials.validate()?;

        if self.scopes.is_empty() {
            return Err(GoogleError::invalid_credentials(
                "at least one OAuth scope is required",
            ));
        }

        Ok(())
    }
}

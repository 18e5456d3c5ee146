//! OAuth client credentials from `credentials.json`.

use serde::Deserialize;

use crate::error::{GoogleError, GoogleResult};

/// Google's authorization endpoint, used when the file does not name one.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint, used when the file does not name one.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth 2.0 client material issued by the Google Cloud Console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// Authorization endpoint.
    pub auth_uri: String,
    /// Token endpoint.
    pub token_uri: String,
    /// Redirect URI sent with the authorization request and the exchange.
    pub redirect_uri: Option<String>,
}

/// Shape of the downloaded credentials JSON.
///
/// Desktop clients carry an `installed` section, web clients a `web`
/// section. A flat object with `client_id`/`client_secret` at the root
/// (as written by gcloud) is accepted too.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientCredentials {
    /// Creates credentials pointing at Google's default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_uri: GOOGLE_AUTH_URL.to_string(),
            token_uri: GOOGLE_TOKEN_URL.to_string(),
            redirect_uri: None,
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Parses the contents of a Google credentials JSON file.
    pub fn from_json(json: &str) -> GoogleResult<Self> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
            GoogleError::invalid_credentials("unable to parse client secret file").with_source(e)
        })?;

        if let Some(section) = file.installed.or(file.web) {
            let ClientSection {
                client_id,
                client_secret,
                auth_uri,
                token_uri,
                redirect_uris,
            } = section;
            let credentials = Self {
                client_id,
                client_secret,
                auth_uri: auth_uri.unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
                token_uri: token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
                redirect_uri: redirect_uris.into_iter().next(),
            };
            credentials.validate()?;
            return Ok(credentials);
        }

        if let (Some(client_id), Some(client_secret)) = (file.client_id, file.client_secret) {
            let credentials = Self::new(client_id, client_secret);
            credentials.validate()?;
            return Ok(credentials);
        }

        Err(GoogleError::invalid_credentials(
            "client secret file must contain an 'installed' or 'web' section, \
             or 'client_id'/'client_secret' at the root",
        ))
    }

    /// Checks that both halves of the client pair are present.
    pub fn validate(&self) -> GoogleResult<()> {
        if self.client_id.is_empty() {
            return Err(GoogleError::invalid_credentials("client_id is required"));
        }
        if self.client_secret.is_empty() {
            return Err(GoogleError::invalid_credentials("client_secret is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GoogleErrorCode;

    #[test]
    fn from_json_installed() {
        let json = r#"{
            "installed": {
                "client_id": "desk.apps.googleusercontent.com",
                "project_id": "time-tracker",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
                "client_secret": "desk-secret",
                "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
            }
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "desk.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "desk-secret");
        assert_eq!(creds.token_uri, GOOGLE_TOKEN_URL);
        assert_eq!(creds.redirect_uri.as_deref(), Some("urn:ietf:wg:oauth:2.0:oob"));
    }

    #[test]
    fn from_json_web_uses_custom_endpoints() {
        let json = r#"{
            "web": {
                "client_id": "web-id",
                "client_secret": "web-secret",
                "auth_uri": "https://auth.example.com/authorize",
                "token_uri": "https://auth.example.com/token"
            }
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(creds.auth_uri, "https://auth.example.com/authorize");
        assert_eq!(creds.token_uri, "https://auth.example.com/token");
        assert!(creds.redirect_uri.is_none());
    }

    #[test]
    fn from_json_flat() {
        let json = r#"{
            "client_id": "flat-id.apps.googleusercontent.com",
            "client_secret": "flat-secret",
            "refresh_token": "ignored"
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(
            creds,
            ClientCredentials::new("flat-id.apps.googleusercontent.com", "flat-secret")
        );
    }

    #[test]
    fn from_json_without_client_section() {
        let err = ClientCredentials::from_json(r#"{ "other": {} }"#).unwrap_err();
        assert_eq!(err.code(), GoogleErrorCode::InvalidCredentials);
        assert!(err.message().contains("installed"));
    }

    #[test]
    fn from_json_malformed() {
        let err = ClientCredentials::from_json("not json").unwrap_err();
        assert_eq!(err.code(), GoogleErrorCode::InvalidCredentials);
        assert!(err.message().contains("parse"));
    }

    #[test]
    fn from_json_empty_secret() {
        let json = r#"{ "installed": { "client_id": "id", "client_secret": "" } }"#;
        let err = ClientCredentials::from_json(json).unwrap_err();
        assert!(err.message().contains("client_secret"));
    }
}

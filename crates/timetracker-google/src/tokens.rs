//! OAuth token cache.
//!
//! The token lives in `token.json` inside the application directory. It is
//! written once after an authorization-code exchange and read back verbatim
//! on every later run. Expiry is never checked here: an expired token is
//! handed to the calendar client as-is, which refreshes it in memory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{GoogleError, GoogleResult};
use crate::oauth::CodeExchange;

/// Seconds before the recorded expiry at which a token counts as expired.
const EXPIRY_DELTA_SECS: i64 = 10;

/// An OAuth 2.0 token as stored in `token.json`.
///
/// Field names follow the common `access_token`/`token_type`/
/// `refresh_token`/`expiry` layout so files written by other OAuth2
/// clients load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The bearer token sent with API requests.
    pub access_token: String,

    /// Usually `Bearer`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,

    /// Long-lived token used to mint new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token stops being accepted.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_expiry"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a bearer token without expiry or refresh token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Sets the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Returns true if the access token is expired or about to expire.
    ///
    /// Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expiry
            .is_some_and(|expiry| Utc::now() + Duration::seconds(EXPIRY_DELTA_SECS) >= expiry)
    }
}

/// Reads `expiry`, treating the zero timestamp `0001-01-01T00:00:00Z` as unset.
fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let expiry = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(expiry.filter(|t| t.year() > 1))
}

/// Interactive half of the authorization-code flow.
pub trait AuthorizationPrompt {
    /// Shows `auth_url` to the operator and returns the code they type back.
    fn request_code(&mut self, auth_url: &str) -> GoogleResult<String>;
}

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store for the token file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the token file exists.
    ///
    /// Any failure other than "not found" is an error.
    pub fn exists(&self) -> GoogleResult<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GoogleError::token_storage("error checking token file").with_source(e)),
        }
    }

    /// Returns the cached token, running the authorization flow first when
    /// there is none.
    ///
    /// A cached token is returned without looking at its expiry.
    pub async fn obtain<E, P>(&self, exchange: &E, prompt: &mut P) -> GoogleResult<Token>
    where
        E: CodeExchange + ?Sized,
        P: AuthorizationPrompt + ?Sized,
    {
        if self.exists()? {
            return self.load();
        }

        debug!(path = %self.path.display(), "no cached token");
        self.authorize(exchange, prompt).await
    }

    /// Runs the authorization-code flow and overwrites the token file.
    pub async fn authorize<E, P>(&self, exchange: &E, prompt: &mut P) -> GoogleResult<Token>
    where
        E: CodeExchange + ?Sized,
        P: AuthorizationPrompt + ?Sized,
    {
        let auth_url = exchange.authorization_url();
        debug!(url = %auth_url, "requesting authorization code");

        let code = prompt.request_code(&auth_url)?;

        info!("exchanging authorization code for a token");
        let token = exchange.exchange(&code).await?;

        self.save(&token)?;
        Ok(token)
    }

    /// Reads and parses the token file.
    pub fn load(&self) -> GoogleResult<Token> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            GoogleError::token_storage("error reading token from file").with_source(e)
        })?;

        let token: Token = serde_json::from_str(&content).map_err(|e| {
            GoogleError::token_storage("error deserializing token from file").with_source(e)
        })?;

        info!(path = %self.path.display(), "loaded cached token");
        Ok(token)
    }

    /// Writes the token file.
    ///
    /// The content goes to a temporary sibling first and is renamed into
    /// place, so the token file is either fully written or left unchanged.
    pub fn save(&self, token: &Token) -> GoogleResult<()> {
        let content = serde_json::to_string_pretty(token).map_err(|e| {
            GoogleError::token_storage("unable to serialize token").with_source(e)
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        let written = write_private(&temp_path, content.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(GoogleError::token_storage("error writing to file").with_source(e));
        }

        info!(path = %self.path.display(), "saved token");
        Ok(())
    }
}

/// Writes `content` to a file only the current user can read.
fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        // A leftover file keeps its old mode when reopened.
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::GoogleErrorCode;
    use crate::oauth::BoxFuture;

    struct FakeExchange {
        token: Token,
        codes: Mutex<Vec<String>>,
    }

    impl FakeExchange {
        fn new(token: Token) -> Self {
            Self {
                token,
                codes: Mutex::new(Vec::new()),
            }
        }

        fn codes(&self) -> Vec<String> {
            self.codes.lock().unwrap().clone()
        }
    }

    impl CodeExchange for FakeExchange {
        fn authorization_url(&self) -> String {
            "https://accounts.example.com/auth?state=state-token".to_string()
        }

        fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, GoogleResult<Token>> {
            Box::pin(async move {
                self.codes.lock().unwrap().push(code.to_string());
                Ok(self.token.clone())
            })
        }
    }

    #[derive(Default)]
    struct ScriptedPrompt {
        code: Option<String>,
        shown: Vec<String>,
    }

    impl ScriptedPrompt {
        fn answering(code: &str) -> Self {
            Self {
                code: Some(code.to_string()),
                shown: Vec::new(),
            }
        }
    }

    impl AuthorizationPrompt for ScriptedPrompt {
        fn request_code(&mut self, auth_url: &str) -> GoogleResult<String> {
            self.shown.push(auth_url.to_string());
            self.code
                .clone()
                .ok_or_else(|| GoogleError::prompt("unable to read authorization code"))
        }
    }

    fn sample_token() -> Token {
        Token::new("ya29.access")
            .with_refresh_token("1//refresh")
            .with_expiry(Utc::now() + Duration::hours(1))
    }

    #[test]
    fn token_round_trips_through_json() {
        let token = sample_token();
        let json = serde_json::to_string(&token).unwrap();
        let parsed: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn token_reads_zero_expiry_as_unset() {
        let json = r#"{
            "access_token": "ya29.access",
            "token_type": "Bearer",
            "expiry": "0001-01-01T00:00:00Z"
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert!(token.expiry.is_none());
        assert!(token.refresh_token.is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn token_reads_offset_expiry() {
        let json = r#"{
            "access_token": "a",
            "expiry": "2024-03-15T10:00:00.123456789+01:00"
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        let expiry = token.expiry.unwrap();
        assert_eq!(expiry.to_rfc3339(), "2024-03-15T09:00:00.123456789+00:00");
        assert!(token.is_expired());
    }

    #[test]
    fn token_expiry_uses_delta() {
        let soon = Token::new("a").with_expiry(Utc::now() + Duration::seconds(5));
        assert!(soon.is_expired());

        let later = Token::new("a").with_expiry(Utc::now() + Duration::minutes(5));
        assert!(!later.is_expired());
    }

    #[test]
    fn token_serialization_skips_missing_fields() {
        let json = serde_json::to_value(Token::new("a")).unwrap();
        assert_eq!(json, serde_json::json!({"access_token": "a", "token_type": "Bearer"}));
    }

    #[tokio::test]
    async fn obtain_without_cache_prompts_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        let exchange = FakeExchange::new(sample_token());
        let mut prompt = ScriptedPrompt::answering("4/0Acode");

        let token = store.obtain(&exchange, &mut prompt).await.unwrap();

        assert_eq!(token, exchange.token);
        assert_eq!(prompt.shown, vec![exchange.authorization_url()]);
        assert_eq!(exchange.codes(), vec!["4/0Acode".to_string()]);
        assert!(store.path().exists());
        assert!(!tmp.path().join("token.json.tmp").exists());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["access_token"], "ya29.access");
        assert_eq!(on_disk["refresh_token"], "1//refresh");
        assert!(on_disk["expiry"].is_string());
    }

    #[tokio::test]
    async fn obtain_with_cache_skips_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        let cached = Token::new("cached")
            .with_refresh_token("r")
            .with_expiry(Utc::now() - Duration::days(3));
        store.save(&cached).unwrap();

        let exchange = FakeExchange::new(Token::new("fresh"));
        let mut prompt = ScriptedPrompt::default();

        let token = store.obtain(&exchange, &mut prompt).await.unwrap();

        // Expired, but returned verbatim.
        assert_eq!(token, cached);
        assert!(token.is_expired());
        assert!(prompt.shown.is_empty());
        assert!(exchange.codes().is_empty());
    }

    #[tokio::test]
    async fn obtain_with_malformed_cache_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        fs::write(store.path(), "{ not json").unwrap();

        let exchange = FakeExchange::new(Token::new("fresh"));
        let mut prompt = ScriptedPrompt::answering("code");

        let err = store.obtain(&exchange, &mut prompt).await.unwrap_err();

        assert_eq!(err.code(), GoogleErrorCode::TokenStorage);
        assert_eq!(err.message(), "error deserializing token from file");
        assert!(prompt.shown.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn obtain_without_code_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        let exchange = FakeExchange::new(Token::new("fresh"));
        let mut prompt = ScriptedPrompt::default();

        let err = store.obtain(&exchange, &mut prompt).await.unwrap_err();

        assert_eq!(err.code(), GoogleErrorCode::Prompt);
        assert!(exchange.codes().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn authorize_overwrites_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        store.save(&Token::new("old")).unwrap();

        let exchange = FakeExchange::new(Token::new("new"));
        let mut prompt = ScriptedPrompt::answering("code");
        store.authorize(&exchange, &mut prompt).await.unwrap();

        assert_eq!(store.load().unwrap().access_token, "new");
    }

    #[cfg(unix)]
    #[test]
    fn exists_reports_check_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "").unwrap();

        let store = TokenStore::new(file.join("token.json"));
        let err = store.exists().unwrap_err();
        assert_eq!(err.message(), "error checking token file");
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        store.save(&Token::new("a")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        fs::create_dir(store.path()).unwrap();

        let err = store.save(&Token::new("a")).unwrap_err();

        assert_eq!(err.code(), GoogleErrorCode::TokenStorage);
        assert_eq!(err.message(), "error writing to file");
        assert!(!tmp.path().join("token.json.tmp").exists());
        assert!(store.path().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn leftover_temp_file_is_made_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let leftover = tmp.path().join("token.json.tmp");
        fs::write(&leftover, "stale").unwrap();
        fs::set_permissions(&leftover, fs::Permissions::from_mode(0o644)).unwrap();

        let store = TokenStore::new(tmp.path().join("token.json"));
        store.save(&Token::new("fresh")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().access_token, "fresh");
        assert!(!leftover.exists());
    }
}

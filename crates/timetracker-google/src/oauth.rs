//! OAuth 2.0 authorization-code flow for installed applications.
//!
//! The operator opens the authorization URL in a browser, grants access,
//! and pastes the code Google shows back into the terminal. The code is then
//! exchanged at the token endpoint for an access token and, because the
//! request asks for `access_type=offline`, a refresh token.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::OAuthConfig;
use crate::error::{GoogleError, GoogleResult};
use crate::tokens::Token;

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The non-interactive half of the authorization-code flow.
pub trait CodeExchange {
    /// Returns the URL the operator visits to grant access.
    fn authorization_url(&self) -> String;

    /// Exchanges a one-time authorization code for a token.
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, GoogleResult<Token>>;
}

/// OAuth client for Google's endpoints.
#[derive(Debug)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    pub fn new(config: OAuthConfig) -> GoogleResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GoogleError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Builds the authorization URL with offline access.
    pub fn authorization_url(&self) -> String {
        build_authorization_url(&self.config)
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> GoogleResult<Token> {
        let credentials = &self.config.credentials;
        let mut params = vec![("grant_type", "authorization_code"), ("code", code)];
        if let Some(ref redirect_uri) = credentials.redirect_uri {
            params.push(("redirect_uri", redirect_uri.as_str()));
        }
        params.push(("client_id", credentials.client_id.as_str()));
        params.push(("client_secret", credentials.client_secret.as_str()));

        let response = self
            .post_token_request(&params)
            .await
            .map_err(|e| e.with_context("unable to retrieve token from web"))?;

        info!("obtained token from authorization code");
        Ok(response.into_token(Utc::now(), None))
    }

    /// Mints a new access token from the refresh token in `token`.
    ///
    /// Google usually omits the refresh token from refresh responses; the
    /// original one is carried over in that case.
    pub async fn refresh(&self, token: &Token) -> GoogleResult<Token> {
        let refresh_token = token.refresh_token.as_deref().ok_or_else(|| {
            GoogleError::authentication("token has no refresh token")
        })?;

        let credentials = &self.config.credentials;
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self.post_token_request(&params).await?;

        info!("refreshed access token");
        Ok(response.into_token(Utc::now(), token.refresh_token.clone()))
    }

    async fn post_token_request(&self, params: &[(&str, &str)]) -> GoogleResult<TokenResponse> {
        let token_uri = &self.config.credentials.token_uri;
        debug!(url = %token_uri, "posting token request");

        let response = self
            .http_client
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| GoogleError::network("token request failed").with_source(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GoogleError::network("failed to read token response").with_source(e))?;

        if !status.is_success() {
            return Err(GoogleError::authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        parse_token_response(&body)
    }
}

impl CodeExchange for OAuthClient {
    fn authorization_url(&self) -> String {
        OAuthClient::authorization_url(self)
    }

    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, GoogleResult<Token>> {
        Box::pin(self.exchange_code(code))
    }
}

fn build_authorization_url(config: &OAuthConfig) -> String {
    let credentials = &config.credentials;
    let scope = config.scopes.join(" ");

    let mut url = format!(
        "{}?access_type=offline&client_id={}",
        credentials.auth_uri,
        urlencoding::encode(&credentials.client_id),
    );
    if let Some(ref redirect_uri) = credentials.redirect_uri {
        url.push_str("&redirect_uri=");
        url.push_str(&urlencoding::encode(redirect_uri));
    }
    url.push_str("&response_type=code&scope=");
    url.push_str(&urlencoding::encode(&scope));
    url.push_str("&state=");
    url.push_str(&urlencoding::encode(&config.state));
    url
}

fn parse_token_response(body: &str) -> GoogleResult<TokenResponse> {
    serde_json::from_str(body)
        .map_err(|e| GoogleError::invalid_response("invalid token response").with_source(e))
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>, fallback_refresh: Option<String>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self.refresh_token.or(fallback_refresh),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| now + Duration::seconds(secs)),
        }
    }
}

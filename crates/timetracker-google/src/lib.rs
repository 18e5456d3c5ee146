//! Google OAuth2 credentials, token cache and Calendar API client.
//!
//! - [`ClientCredentials`] - Client material parsed from `credentials.json`
//! - [`TokenStore`] - The `token.json` cache and the authorization-code flow
//! - [`OAuthClient`] - Authorization URL, code exchange, token refresh
//! - [`CalendarClient`] - The single read-only Calendar API call
//!
//! # Flow
//!
//! ```text
//! credentials.json ──► ClientCredentials ──► OAuthConfig ──► OAuthClient
//!                                                               │
//!   token.json ◄──── TokenStore::obtain(&OAuthClient, prompt) ◄─┘
//!                              │
//!                              ▼ Token
//!                      CalendarClient::list_calendars()
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod tokens;

pub use client::{CalendarClient, CalendarListEntry};
pub use config::OAuthConfig;
pub use credentials::{ClientCredentials, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL};
pub use error::{GoogleError, GoogleErrorCode, GoogleResult};
pub use oauth::{BoxFuture, CodeExchange, OAuthClient};
pub use tokens::{AuthorizationPrompt, Token, TokenStore};

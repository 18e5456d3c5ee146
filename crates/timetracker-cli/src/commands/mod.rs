//! Subcommand implementations.
//!
//! Every command that needs Google starts with [`prepare`], which runs the
//! application directory bootstrap and prints the same status lines the
//! operator sees on every run.

pub mod auth;
pub mod calendars;
pub mod paths;

use std::io::Write;

use tracing::debug;

use timetracker_core::{AppDir, Bootstrap};
use timetracker_google::{ClientCredentials, OAuthClient, TokenStore};

use crate::config::Settings;
use crate::error::{ClientError, ClientResult};

/// What a command needs once credentials are available.
#[derive(Debug)]
pub struct Session {
    /// OAuth client built from `credentials.json` and `config.toml`.
    pub oauth: OAuthClient,
    /// Cache for `token.json`.
    pub store: TokenStore,
}

/// Bootstraps the application directory.
///
/// Returns `None` when the run should stop successfully: the directory was
/// just created, or it holds no credentials yet.
pub fn prepare<W: Write>(dir: &AppDir, out: &mut W) -> ClientResult<Option<Session>> {
    match dir.bootstrap()? {
        Bootstrap::Created => {
            writeln!(out, "Directory created successfully")?;
            writeln!(
                out,
                "Copy your app credentials.json file to app directory: {}",
                dir.root().display()
            )?;
            Ok(None)
        }
        Bootstrap::MissingCredentials => {
            writeln!(out, "Directory already exists")?;
            writeln!(out, "Credentials file does not exist.")?;
            Ok(None)
        }
        Bootstrap::Ready { credentials } => {
            writeln!(out, "Directory already exists")?;

            let credentials = ClientCredentials::from_json(&credentials)?;
            debug!(client_id = %credentials.client_id, "parsed client credentials");

            let settings = Settings::load(dir).map_err(ClientError::Config)?;
            let oauth = OAuthClient::new(settings.to_oauth_config(credentials))?;

            Ok(Some(Session {
                oauth,
                store: TokenStore::new(dir.token_path()),
            }))
        }
    }
}

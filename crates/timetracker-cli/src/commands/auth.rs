//! Authorization command.

use std::io::Write;

use tracing::info;

use timetracker_core::AppDir;
use timetracker_google::AuthorizationPrompt;

use crate::error::ClientResult;

/// Bootstraps the directory and stores a token.
///
/// An existing token is kept unless `force` is set, in which case a fresh
/// authorization overwrites it.
pub async fn run<P, W>(dir: &AppDir, force: bool, prompt: &mut P, out: &mut W) -> ClientResult<()>
where
    P: AuthorizationPrompt,
    W: Write,
{
    let Some(session) = super::prepare(dir, out)? else {
        return Ok(());
    };

    if !force && session.store.exists()? {
        writeln!(out, "Already authorized with Google Calendar.")?;
        writeln!(out, "Use --force to re-authorize.")?;
        return Ok(());
    }

    session.store.authorize(&session.oauth, prompt).await?;

    info!("authorization complete");
    writeln!(out, "Authorization successful.")?;
    writeln!(out, "Token saved to {}", session.store.path().display())?;
    Ok(())
}

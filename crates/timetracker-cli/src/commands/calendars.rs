//! Calendar listing, the default command.

use std::io::Write;

use tracing::info;

use timetracker_core::AppDir;
use timetracker_google::{AuthorizationPrompt, CalendarClient, CalendarListEntry};

use crate::error::{ClientError, ClientResult};

/// Runs the full flow: bootstrap, obtain a token, list calendars.
pub async fn run<P, W>(dir: &AppDir, json: bool, prompt: &mut P, out: &mut W) -> ClientResult<()>
where
    P: AuthorizationPrompt,
    W: Write,
{
    let Some(session) = super::prepare(dir, out)? else {
        return Ok(());
    };

    let token = session.store.obtain(&session.oauth, prompt).await?;

    let mut client = CalendarClient::new(&session.oauth, token);
    let calendars = client.list_calendars().await?;
    info!(count = calendars.len(), "listed calendars");

    let rendered = if json {
        render_json(&calendars)?
    } else {
        render_text(&calendars)
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Renders calendars as `- <summary> (<id>)` lines.
pub fn render_text(calendars: &[CalendarListEntry]) -> String {
    if calendars.is_empty() {
        return "No calendars found.\n".to_string();
    }

    let mut rendered = String::from("Calendars:\n");
    for calendar in calendars {
        rendered.push_str(&format!("- {} ({})\n", calendar.summary, calendar.id));
    }
    rendered
}

/// Renders calendars as a pretty-printed JSON array.
pub fn render_json(calendars: &[CalendarListEntry]) -> ClientResult<String> {
    let mut rendered = serde_json::to_string_pretty(calendars).map_err(ClientError::Render)?;
    rendered.push('\n');
    Ok(rendered)
}

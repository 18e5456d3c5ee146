//! Google Calendar API client.
//!
//! The client is built from the token the cache hands out. If that token has
//! expired and carries a refresh token, a fresh access token is minted in
//! memory before the request; the token file is left untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GoogleError, GoogleResult};
use crate::oauth::OAuthClient;
use crate::tokens::Token;

/// Authenticated Google Calendar API client.
#[derive(Debug)]
pub struct CalendarClient<'a> {
    oauth: &'a OAuthClient,
    token: Token,
}

impl<'a> CalendarClient<'a> {
    /// Creates a client that authenticates with `token`.
    pub fn new(oauth: &'a OAuthClient, token: Token) -> Self {
        Self { oauth, token }
    }

    /// Returns a usable access token, refreshing in memory when possible.
    async fn access_token(&mut self) -> GoogleResult<String> {
        if self.token.is_expired() {
            if self.token.refresh_token.is_some() {
                debug!("access token expired, refreshing");
                self.token = self.oauth.refresh(&self.token).await?;
            } else {
                warn!("access token expired and no refresh token is available");
            }
        }
        Ok(self.token.access_token.clone())
    }

    /// Lists the calendars on the user's calendar list.
    pub async fn list_calendars(&mut self) -> GoogleResult<Vec<CalendarListEntry>> {
        let access_token = self.access_token().await?;
        let url = format!("{}/users/me/calendarList", self.oauth.config().api_base);

        let response = self
            .oauth
            .http_client()
            .get(&url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| GoogleError::network("calendar list request failed").with_source(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GoogleError::authentication("access token expired or invalid"));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::server(format!("API error ({}): {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GoogleError::network("failed to read response").with_source(e))?;

        let calendars = parse_calendar_list(&body)?;
        debug!(count = calendars.len(), "fetched calendar list");
        Ok(calendars)
    }
}

fn parse_calendar_list(body: &str) -> GoogleResult<Vec<CalendarListEntry>> {
    let list: CalendarListResponse = serde_json::from_str(body).map_err(|e| {
        GoogleError::invalid_response("failed to parse calendar list").with_source(e)
    })?;
    Ok(list.items)
}

/// Response from the calendarList endpoint.
#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
}

/// A calendar from the calendar list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    /// The calendar ID.
    pub id: String,
    /// The calendar title.
    #[serde(default)]
    pub summary: String,
    /// The calendar description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is the user's primary calendar.
    #[serde(default)]
    pub primary: bool,
    /// The calendar timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// The caller's access role, e.g. `owner` or `reader`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_role: Option<String>,
}

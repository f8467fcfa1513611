//! Google Calendar quick-add.
//!
//! OAuth2 refresh-token exchange followed by `events.quickAdd` with the
//! natural-language event text. The agent consumes failures as structured
//! tool-result data, so every error here stays non-fatal.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::CalendarConfig;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Google Calendar is not configured.")]
    NotConfigured,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange failed with HTTP {0}")]
    TokenExchange(u16),
    #[error("calendar API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("event was not created (no event id returned)")]
    NoEventId,
}

/// The created event, as reported back to the agent.
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub event_id: String,
    pub summary: Option<String>,
}

/// Trait seam for calendar event creation.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Create an event from natural-language text (e.g. "Dentist tomorrow 2pm").
    async fn quick_add(&self, text: &str) -> Result<CreatedEvent, CalendarError>;
}

pub struct GoogleCalendar {
    http: reqwest::Client,
    config: CalendarConfig,
    /// Cached bearer token with its expiry instant.
    token: Mutex<Option<(String, std::time::Instant)>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

#[derive(Deserialize)]
struct EventResponse {
    id: Option<String>,
    summary: Option<String>,
}

impl GoogleCalendar {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    /// Exchange the refresh token for an access token, reusing a cached one
    /// until a minute before expiry.
    async fn access_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.token.lock().await;
        if let Some((token, expires_at)) = cached.as_ref() {
            if std::time::Instant::now() < *expires_at {
                return Ok(token.clone());
            }
        }

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CalendarError::TokenExchange(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = std::time::Instant::now()
            + std::time::Duration::from_secs(token.expires_in.saturating_sub(60));
        *cached = Some((token.access_token.clone(), expires_at));
        debug!("calendar access token refreshed");
        Ok(token.access_token)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn quick_add(&self, text: &str) -> Result<CreatedEvent, CalendarError> {
        if !self.config.is_configured() {
            return Err(CalendarError::NotConfigured);
        }

        let token = self.access_token().await?;
        let url = format!(
            "{CALENDAR_API}/calendars/{}/events/quickAdd",
            self.config.calendar_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let event: EventResponse = response.json().await?;
        let event_id = event.id.ok_or(CalendarError::NoEventId)?;
        Ok(CreatedEvent {
            event_id,
            summary: event.summary,
        })
    }
}

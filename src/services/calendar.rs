use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AssistantError;
use crate::models::{AppointmentFields, CalendarEvent, EventRef};
use crate::services::secrets::SecretStore;

const TOKEN_KEY: &str = "google-calendar";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const EVENTS_ENDPOINT: &str =
    "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Compute the concrete event window in the configured timezone.
/// end = start + duration, exactly.
pub fn schedule_event(
    fields: &AppointmentFields,
    timezone: FixedOffset,
) -> Result<CalendarEvent, AssistantError> {
    let start = fields
        .date
        .and_time(fields.time)
        .and_local_timezone(timezone)
        .single()
        .ok_or_else(|| AssistantError::Extraction("ambiguous local time".to_string()))?;

    Ok(CalendarEvent {
        summary: fields.title.clone(),
        end: start + Duration::minutes(fields.duration_minutes),
        start,
    })
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn insert_event(&self, event: &CalendarEvent) -> Result<EventRef, AssistantError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAuthorization {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

pub struct GoogleCalendar {
    client_id: String,
    client_secret: String,
    secrets: Box<dyn SecretStore>,
    client: reqwest::Client,
}

impl GoogleCalendar {
    pub fn new(client_id: String, client_secret: String, secrets: Box<dyn SecretStore>) -> Self {
        Self {
            client_id,
            client_secret,
            secrets,
            client: reqwest::Client::new(),
        }
    }

    /// One-time provisioning: exchange an authorization code for tokens and
    /// persist them. Request handling never starts an interactive flow; a
    /// missing stored credential is a hard failure.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<(), AssistantError> {
        let resp = self
            .client
            .post(TOKEN_ENDPOINT)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let auth = parse_token_response(resp, None).await?;
        self.persist(&auth)
    }

    async fn authorization(&self) -> Result<StoredAuthorization, AssistantError> {
        let stored = self
            .secrets
            .load(TOKEN_KEY)?
            .ok_or(AssistantError::CalendarUnauthorized)?;
        let auth: StoredAuthorization =
            serde_json::from_str(&stored).map_err(|_| AssistantError::CalendarUnauthorized)?;

        // Refresh a minute early so an in-flight insert doesn't race expiry.
        if auth.expires_at > Utc::now() + Duration::seconds(60) {
            return Ok(auth);
        }

        let refreshed = self.refresh(&auth).await?;
        self.persist(&refreshed)?;
        Ok(refreshed)
    }

    async fn refresh(
        &self,
        auth: &StoredAuthorization,
    ) -> Result<StoredAuthorization, AssistantError> {
        let resp = self
            .client
            .post(TOKEN_ENDPOINT)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", auth.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        parse_token_response(resp, Some(auth.refresh_token.clone())).await
    }

    fn persist(&self, auth: &StoredAuthorization) -> Result<(), AssistantError> {
        let value = serde_json::to_string(auth)
            .map_err(|e| AssistantError::Auth(format!("failed to serialize tokens: {e}")))?;
        self.secrets.store(TOKEN_KEY, &value)
    }
}

async fn parse_token_response(
    resp: reqwest::Response,
    fallback_refresh: Option<String>,
) -> Result<StoredAuthorization, AssistantError> {
    let status = resp.status();
    let data: serde_json::Value = resp.json().await?;

    if !status.is_success() {
        let detail = data["error_description"]
            .as_str()
            .or_else(|| data["error"].as_str())
            .unwrap_or("token request failed")
            .to_string();
        return Err(AssistantError::from_status(status, detail));
    }

    let access_token = data["access_token"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| AssistantError::Provider("missing access token".to_string()))?;

    // Google omits the refresh token on refresh grants; keep the stored one.
    let refresh_token = data["refresh_token"]
        .as_str()
        .map(|s| s.to_string())
        .or(fallback_refresh)
        .ok_or(AssistantError::CalendarUnauthorized)?;

    let expires_in = data["expires_in"].as_i64().unwrap_or(3600);

    Ok(StoredAuthorization {
        access_token,
        refresh_token,
        expires_at: Utc::now() + Duration::seconds(expires_in),
    })
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn insert_event(&self, event: &CalendarEvent) -> Result<EventRef, AssistantError> {
        let auth = self.authorization().await?;

        let body = json!({
            "summary": event.summary,
            "start": { "dateTime": event.start.to_rfc3339() },
            "end": { "dateTime": event.end.to_rfc3339() },
        });

        let resp = self
            .client
            .post(EVENTS_ENDPOINT)
            .bearer_auth(&auth.access_token)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await?;

        if !status.is_success() {
            let detail = data["error"]["message"]
                .as_str()
                .unwrap_or("event insert failed")
                .to_string();
            return Err(AssistantError::from_status(status, detail));
        }

        let id = data["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AssistantError::Provider("missing event id".to_string()))?;
        let link = data["htmlLink"].as_str().unwrap_or_default().to_string();

        Ok(EventRef { id, link })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn fields(date: &str, time: &str, minutes: i64) -> AppointmentFields {
        AppointmentFields {
            title: "Standup".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn test_schedule_event_end_is_start_plus_duration() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let event = schedule_event(&fields("2024-05-01", "10:00", 30), tz).unwrap();
        assert_eq!(event.start.to_rfc3339(), "2024-05-01T10:00:00+02:00");
        assert_eq!(event.end.to_rfc3339(), "2024-05-01T10:30:00+02:00");
    }

    #[test]
    fn test_schedule_event_crosses_midnight() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let event = schedule_event(&fields("2024-05-01", "23:45", 30), tz).unwrap();
        assert_eq!(event.end.to_rfc3339(), "2024-05-02T00:15:00+00:00");
    }

    #[test]
    fn test_schedule_event_keeps_summary() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let event = schedule_event(&fields("2024-05-01", "09:00", 15), tz).unwrap();
        assert_eq!(event.summary, "Standup");
    }
}

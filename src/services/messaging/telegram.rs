use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::ChatTransport;
use crate::errors::AssistantError;
use crate::models::{InboundEvent, Payload};
use crate::services::transfer;

const API_BASE: &str = "https://api.telegram.org";
const POLL_WINDOW_SECS: u64 = 50;
// Must exceed the long-poll window so an idle poll isn't cut short.
const POLL_TIMEOUT: Duration = Duration::from_secs(70);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub from: Option<Sender>,
    pub chat: Chat,
    pub text: Option<String>,
    pub voice: Option<Voice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,
}

/// Map a raw update to a domain event. Only commands and voice notes are
/// handled; plain chatter and service updates yield nothing.
pub fn inbound_event(update: &Update) -> Option<InboundEvent> {
    let message = update.message.as_ref()?;
    let user_id = message.from.as_ref()?.id;
    let chat_id = message.chat.id;

    if let Some(voice) = &message.voice {
        return Some(InboundEvent {
            user_id,
            chat_id,
            payload: Payload::Voice {
                file_id: voice.file_id.clone(),
            },
        });
    }

    let text = message.text.as_deref()?.trim();
    if !text.starts_with('/') {
        return None;
    }

    Some(InboundEvent {
        user_id,
        chat_id,
        payload: Payload::Command(text.to_string()),
    })
}

pub struct TelegramClient {
    token: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, AssistantError> {
        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_WINDOW_SECS.to_string()),
            ])
            .timeout(POLL_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        let data: ApiResponse<Vec<Update>> = resp.json().await?;
        api_result(status, data)
    }

    async fn file_url(&self, file_id: &str) -> Result<String, AssistantError> {
        #[derive(Deserialize)]
        struct File {
            file_path: Option<String>,
        }

        let resp = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        let data: ApiResponse<File> = resp.json().await?;
        let file = api_result(status, data)?;
        let path = file
            .file_path
            .ok_or_else(|| AssistantError::Provider("missing file path".to_string()))?;

        Ok(format!("{API_BASE}/file/bot{}/{path}", self.token))
    }
}

fn api_result<T>(status: StatusCode, data: ApiResponse<T>) -> Result<T, AssistantError> {
    if !status.is_success() || !data.ok {
        let detail = data
            .description
            .unwrap_or_else(|| "telegram api error".to_string());
        return Err(AssistantError::from_status(status, detail));
    }
    data.result
        .ok_or_else(|| AssistantError::Provider("missing result in telegram response".to_string()))
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AssistantError> {
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        let status = resp.status();
        let data: ApiResponse<serde_json::Value> = resp.json().await?;
        api_result(status, data).map(|_| ())
    }

    async fn send_audio(&self, chat_id: i64, audio: &Path) -> Result<(), AssistantError> {
        let bytes = tokio::fs::read(audio).await.map_err(|e| {
            AssistantError::Download(format!("failed to read {}: {e}", audio.display()))
        })?;

        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| AssistantError::Provider(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("audio", part);

        let resp = self
            .client
            .post(self.method_url("sendAudio"))
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let data: ApiResponse<serde_json::Value> = resp.json().await?;
        api_result(status, data).map(|_| ())
    }

    async fn fetch_media(&self, file_id: &str, dest: &Path) -> Result<(), AssistantError> {
        let url = self.file_url(file_id).await?;
        transfer::download_to(&self.client, &url, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_event_command() {
        let update: Update = serde_json::from_str(
            r#"{"update_id":1,"message":{"message_id":5,"from":{"id":42},"chat":{"id":99},"text":"/ask what is rust?"}}"#,
        )
        .unwrap();

        let event = inbound_event(&update).unwrap();
        assert_eq!(event.user_id, 42);
        assert_eq!(event.chat_id, 99);
        assert!(matches!(event.payload, Payload::Command(ref text) if text == "/ask what is rust?"));
    }

    #[test]
    fn test_inbound_event_voice() {
        let update: Update = serde_json::from_str(
            r#"{"update_id":2,"message":{"message_id":6,"from":{"id":42},"chat":{"id":99},"voice":{"file_id":"abc123","duration":3}}}"#,
        )
        .unwrap();

        let event = inbound_event(&update).unwrap();
        assert!(matches!(event.payload, Payload::Voice { ref file_id } if file_id == "abc123"));
    }

    #[test]
    fn test_inbound_event_ignores_plain_text() {
        let update: Update = serde_json::from_str(
            r#"{"update_id":3,"message":{"message_id":7,"from":{"id":42},"chat":{"id":99},"text":"hello there"}}"#,
        )
        .unwrap();

        assert!(inbound_event(&update).is_none());
    }

    #[test]
    fn test_inbound_event_ignores_empty_update() {
        let update: Update = serde_json::from_str(r#"{"update_id":4}"#).unwrap();
        assert!(inbound_event(&update).is_none());
    }
}

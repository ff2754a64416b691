use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{Completion, CompletionProvider, Message, SpeechProvider, TranscriptionProvider};
use crate::errors::AssistantError;
use crate::models::TokenUsage;

const API_BASE: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub struct OpenAiClient {
    api_key: String,
    chat_model: String,
    transcription_model: String,
    synthesis_model: String,
    synthesis_voice: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        chat_model: String,
        transcription_model: String,
        synthesis_model: String,
        synthesis_voice: String,
    ) -> Self {
        Self {
            api_key,
            chat_model,
            transcription_model,
            synthesis_model,
            synthesis_voice,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<Completion, AssistantError> {
        let mut chat_messages = vec![json!({
            "role": "system",
            "content": system_prompt,
        })];

        for msg in messages {
            chat_messages.push(json!({
                "role": msg.role,
                "content": msg.content,
            }));
        }

        let body = json!({
            "model": self.chat_model,
            "messages": chat_messages,
        });

        let resp = self
            .client
            .post(format!("{API_BASE}/chat/completions"))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await?;

        if !status.is_success() {
            let detail = data["error"]["message"]
                .as_str()
                .unwrap_or("chat completion request failed")
                .to_string();
            return Err(AssistantError::from_status(status, detail));
        }

        let text = data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AssistantError::Provider("missing content in completion response".to_string())
            })?;

        let usage = serde_json::from_value::<TokenUsage>(data["usage"].clone()).ok();

        Ok(Completion { text, usage })
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, audio: &Path) -> Result<String, AssistantError> {
        let bytes = tokio::fs::read(audio).await.map_err(|e| {
            AssistantError::Download(format!("failed to read {}: {e}", audio.display()))
        })?;

        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("voice.ogg")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/ogg")
            .map_err(|e| AssistantError::Provider(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);

        let resp = self
            .client
            .post(format!("{API_BASE}/audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await?;

        if !status.is_success() {
            let detail = data["error"]["message"]
                .as_str()
                .unwrap_or("transcription request failed")
                .to_string();
            return Err(AssistantError::from_status(status, detail));
        }

        data["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                AssistantError::Provider("missing text in transcription response".to_string())
            })
    }
}

#[async_trait]
impl SpeechProvider for OpenAiClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AssistantError> {
        let body = json!({
            "input": text,
            "model": self.synthesis_model,
            "voice": self.synthesis_voice,
        });

        let resp = self
            .client
            .post(format!("{API_BASE}/audio/speech"))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AssistantError::from_status(status, detail));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

pub mod telegram;

use std::path::Path;

use async_trait::async_trait;

use crate::errors::AssistantError;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AssistantError>;
    async fn send_audio(&self, chat_id: i64, audio: &Path) -> Result<(), AssistantError>;
    async fn fetch_media(&self, file_id: &str, dest: &Path) -> Result<(), AssistantError>;
}

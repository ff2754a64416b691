use std::env;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram_token: String,
    pub openai_api_key: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub synthesis_model: String,
    pub synthesis_voice: String,
    pub allowed_user_id: Option<i64>,
    pub summary_language: String,
    pub timezone: FixedOffset,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub secrets_dir: PathBuf,
    pub media_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            telegram_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            transcription_model: env::var("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            synthesis_model: env::var("SYNTHESIS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            synthesis_voice: env::var("SYNTHESIS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
            allowed_user_id: env::var("ALLOWED_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            summary_language: env::var("SUMMARY_LANGUAGE")
                .unwrap_or_else(|_| "German".to_string()),
            timezone: env::var("TIMEZONE_OFFSET")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Utc.fix()),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            secrets_dir: env::var("SECRETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".attache")),
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        }
    }
}

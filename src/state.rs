use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::ai::{CompletionProvider, SpeechProvider, TranscriptionProvider};
use crate::services::calendar::CalendarProvider;
use crate::services::messaging::ChatTransport;

pub struct AppState {
    pub config: AppConfig,
    pub completion: Arc<dyn CompletionProvider>,
    pub transcription: Arc<dyn TranscriptionProvider>,
    pub synthesis: Arc<dyn SpeechProvider>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub transport: Arc<dyn ChatTransport>,
    pub http: reqwest::Client,
}

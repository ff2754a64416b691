use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use attache::config::AppConfig;
use attache::handlers;
use attache::services::ai::openai::OpenAiClient;
use attache::services::calendar::GoogleCalendar;
use attache::services::messaging::telegram::{self, TelegramClient};
use attache::services::secrets::FileSecretStore;
use attache::state::AppState;

const POLL_BACKOFF: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        !config.telegram_token.is_empty(),
        "TELEGRAM_BOT_TOKEN must be set"
    );
    anyhow::ensure!(!config.openai_api_key.is_empty(), "OPENAI_API_KEY must be set");

    let openai = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.chat_model.clone(),
        config.transcription_model.clone(),
        config.synthesis_model.clone(),
        config.synthesis_voice.clone(),
    ));
    let calendar = GoogleCalendar::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        Box::new(FileSecretStore::new(config.secrets_dir.clone())),
    );
    let transport = Arc::new(TelegramClient::new(config.telegram_token.clone()));

    if let Some(user) = config.allowed_user_id {
        tracing::info!(allowed_user_id = user, "restricting commands to a single sender");
    }

    let state = Arc::new(AppState {
        config,
        completion: openai.clone(),
        transcription: openai.clone(),
        synthesis: openai,
        calendar: Arc::new(calendar),
        transport: transport.clone(),
        http: reqwest::Client::new(),
    });

    tracing::info!("starting update polling");

    let mut offset = 0i64;
    loop {
        let updates = match transport.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "polling failed, backing off");
                tokio::time::sleep(POLL_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            if let Some(event) = telegram::inbound_event(&update) {
                tokio::spawn(handlers::handle_event(Arc::clone(&state), event));
            }
        }
    }
}

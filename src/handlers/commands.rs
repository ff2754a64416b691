use crate::errors::AssistantError;
use crate::models::usage::log_usage;
use crate::services::ai::{intent, Message};
use crate::services::transfer::MediaFile;
use crate::services::{document, transfer};
use crate::state::AppState;

const WELCOME: &str = "Welcome! Send me a command:\n\
- /ask <question>\n\
- /tts <text>\n\
- /pdf <url>\n\
- Or send me a voice memo, and I'll answer it or put an appointment in your calendar.";

const UNKNOWN: &str =
    "Unknown command. Available: /start, /ask <question>, /tts <text>, /pdf <url>.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Ask(String),
    Tts(String),
    Pdf(String),
    Unknown(String),
}

/// Transport-independent command table: name → parsed command. The
/// `/command@BotName` group form resolves to the bare name.
pub fn parse_command(text: &str) -> Command {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let name = name.split('@').next().unwrap_or(name);
    let arg = parts.next().map(str::trim).unwrap_or("").to_string();

    match name {
        "/start" => Command::Start,
        "/ask" => Command::Ask(arg),
        "/tts" => Command::Tts(arg),
        "/pdf" => Command::Pdf(arg),
        _ => Command::Unknown(name.to_string()),
    }
}

pub async fn dispatch(state: &AppState, chat_id: i64, text: &str) -> Result<(), AssistantError> {
    match parse_command(text) {
        Command::Start => state.transport.send_message(chat_id, WELCOME).await,
        Command::Ask(question) if question.is_empty() => {
            state
                .transport
                .send_message(chat_id, "Usage: /ask <question>")
                .await
        }
        Command::Ask(question) => handle_ask(state, chat_id, &question).await,
        Command::Tts(input) if input.is_empty() => {
            state
                .transport
                .send_message(chat_id, "Usage: /tts <text>")
                .await
        }
        Command::Tts(input) => handle_tts(state, chat_id, &input).await,
        Command::Pdf(url) if url.is_empty() => {
            state
                .transport
                .send_message(chat_id, "Usage: /pdf <url>")
                .await
        }
        Command::Pdf(url) => handle_pdf(state, chat_id, &url).await,
        Command::Unknown(name) => {
            tracing::info!(command = %name, chat_id, "unknown command");
            state.transport.send_message(chat_id, UNKNOWN).await
        }
    }
}

async fn handle_ask(state: &AppState, chat_id: i64, question: &str) -> Result<(), AssistantError> {
    let completion = state
        .completion
        .complete(intent::ANSWER_PROMPT, &[Message::user(question)])
        .await?;
    log_usage(completion.usage.as_ref());

    state.transport.send_message(chat_id, &completion.text).await
}

async fn handle_tts(state: &AppState, chat_id: i64, input: &str) -> Result<(), AssistantError> {
    let audio = state.synthesis.synthesize(input).await?;

    let media = MediaFile::new(&state.config.media_dir, "mp3");
    transfer::write_to(&audio, media.path()).await?;

    state.transport.send_audio(chat_id, media.path()).await
}

async fn handle_pdf(state: &AppState, chat_id: i64, url: &str) -> Result<(), AssistantError> {
    let media = MediaFile::new(&state.config.media_dir, "pdf");
    transfer::download_to(&state.http, url, media.path()).await?;

    let text = document::extract_text(media.path())?;

    let prompt = intent::summary_prompt(&state.config.summary_language, &text);
    let completion = state
        .completion
        .complete(intent::ANSWER_PROMPT, &[Message::user(prompt)])
        .await?;
    log_usage(completion.usage.as_ref());

    state.transport.send_message(chat_id, &completion.text).await
}

use crate::errors::AssistantError;
use crate::models::usage::log_usage;
use crate::models::{AppointmentFields, IntentLabel};
use crate::services::ai::{intent, Message};
use crate::services::calendar;
use crate::services::transfer::MediaFile;
use crate::state::AppState;

/// Voice pipeline: fetch the audio, transcribe it, classify the intent, then
/// either answer the question or book the appointment.
pub async fn handle_voice(
    state: &AppState,
    chat_id: i64,
    file_id: &str,
) -> Result<(), AssistantError> {
    let media = MediaFile::new(&state.config.media_dir, "ogg");
    state.transport.fetch_media(file_id, media.path()).await?;

    let transcript = state.transcription.transcribe(media.path()).await?;
    let label = intent::classify(state.completion.as_ref(), &transcript).await?;
    tracing::info!(chat_id, intent = ?label, "voice message classified");

    match label {
        IntentLabel::Question => answer_question(state, chat_id, &transcript).await,
        IntentLabel::Appointment => book_appointment(state, chat_id, &transcript).await,
    }
}

async fn answer_question(
    state: &AppState,
    chat_id: i64,
    transcript: &str,
) -> Result<(), AssistantError> {
    let completion = state
        .completion
        .complete(intent::ANSWER_PROMPT, &[Message::user(transcript)])
        .await?;
    log_usage(completion.usage.as_ref());

    let reply = format!("I understood: {transcript}\n\n{}", completion.text);
    state.transport.send_message(chat_id, &reply).await
}

async fn book_appointment(
    state: &AppState,
    chat_id: i64,
    transcript: &str,
) -> Result<(), AssistantError> {
    let completion = state
        .completion
        .complete(&intent::appointment_prompt(), &[Message::user(transcript)])
        .await?;
    log_usage(completion.usage.as_ref());

    let fields = AppointmentFields::parse(&completion.text)?;
    let event = calendar::schedule_event(&fields, state.config.timezone)?;

    // Insert failures must reach the user as an explicit "not created"
    // notice, not the generic fallback.
    match state.calendar.insert_event(&event).await {
        Ok(inserted) => {
            tracing::info!(chat_id, event_id = %inserted.id, "calendar event created");
            let confirmation = format!(
                "Booked \"{}\" on {} at {} for {} minutes.\n{}",
                fields.title,
                fields.date,
                fields.time.format("%H:%M"),
                fields.duration_minutes,
                inserted.link
            );
            state
                .transport
                .send_message(chat_id, confirmation.trim())
                .await
        }
        Err(e) => {
            tracing::error!(error = %e, chat_id, "calendar insert failed");
            let notice = format!("The event was not created. {}", e.user_message());
            state.transport.send_message(chat_id, &notice).await
        }
    }
}

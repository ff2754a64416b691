pub mod commands;
pub mod voice;

use std::sync::Arc;

use crate::models::{InboundEvent, Payload};
use crate::state::AppState;

/// Outermost per-event handler: access control, dispatch, and the single
/// user-visible failure message.
pub async fn handle_event(state: Arc<AppState>, event: InboundEvent) {
    if let Some(allowed) = state.config.allowed_user_id {
        if event.user_id != allowed {
            tracing::debug!(user_id = event.user_id, "dropping event from non-allowed sender");
            return;
        }
    }

    let chat_id = event.chat_id;
    let outcome = match event.payload {
        Payload::Command(text) => commands::dispatch(&state, chat_id, &text).await,
        Payload::Voice { file_id } => voice::handle_voice(&state, chat_id, &file_id).await,
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, chat_id, "event handling failed");
        if let Err(send_err) = state.transport.send_message(chat_id, e.user_message()).await {
            tracing::error!(error = %send_err, chat_id, "failed to send failure notice");
        }
    }
}

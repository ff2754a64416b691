use chrono::Utc;

use crate::errors::AssistantError;
use crate::models::IntentLabel;
use crate::services::ai::{CompletionProvider, Message};

const CLASSIFY_PROMPT: &str = "You are the intent classifier for a personal assistant. \
Decide whether the user's message is a general question or a request to put an \
appointment in their calendar. Reply with exactly one word: \"question\" or \
\"appointment\". Do not add anything else.";

pub const ANSWER_PROMPT: &str =
    "You are a helpful personal assistant. Answer the user's question concisely.";

pub async fn classify(
    llm: &dyn CompletionProvider,
    transcript: &str,
) -> Result<IntentLabel, AssistantError> {
    let completion = llm
        .complete(CLASSIFY_PROMPT, &[Message::user(transcript)])
        .await?;
    Ok(route(&completion.text))
}

/// Ambiguous or malformed replies fall back to the question path, which has
/// no calendar side effect.
pub fn route(reply: &str) -> IntentLabel {
    if reply.to_lowercase().contains("appointment") {
        IntentLabel::Appointment
    } else {
        IntentLabel::Question
    }
}

pub fn appointment_prompt() -> String {
    let today = Utc::now().format("%Y-%m-%d");
    format!(
        "Extract the appointment details from the user's message. Today's date is {today}. \
Reply with exactly four lines and nothing else:\n\
Title: <short title>\n\
Date: <YYYY-MM-DD>\n\
Time: <HH:MM, 24-hour>\n\
Duration: <length in minutes, digits only>"
    )
}

pub fn summary_prompt(language: &str, document_text: &str) -> String {
    format!("Summarize this PDF in {language}:\n\nHere is the extracted text from the PDF:\n\n{document_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_appointment_token() {
        assert_eq!(route("appointment"), IntentLabel::Appointment);
        assert_eq!(route("APPOINTMENT"), IntentLabel::Appointment);
        assert_eq!(
            route("This looks like an Appointment request."),
            IntentLabel::Appointment
        );
    }

    #[test]
    fn test_route_anything_else_is_question() {
        assert_eq!(route("question"), IntentLabel::Question);
        assert_eq!(route(""), IntentLabel::Question);
        assert_eq!(route("no idea what this is"), IntentLabel::Question);
    }

    #[test]
    fn test_appointment_prompt_names_all_labels() {
        let prompt = appointment_prompt();
        for label in ["Title:", "Date:", "Time:", "Duration:"] {
            assert!(prompt.contains(label));
        }
    }
}

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("document parse error: {0}")]
    Parse(String),

    #[error("appointment extraction failed: {0}")]
    Extraction(String),

    #[error("calendar not authorized")]
    CalendarUnauthorized,
}

impl AssistantError {
    /// Classify a provider HTTP status. `detail` stays in the error for the
    /// logs; it is never shown to the user.
    pub fn from_status(status: StatusCode, detail: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Auth(detail),
            StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimited(detail),
            _ => AssistantError::Provider(detail),
        }
    }

    /// One user-facing line per failure category. Raw provider payloads must
    /// not leak through here.
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistantError::Network(_) => {
                "I couldn't reach one of my services. Please try again in a moment."
            }
            AssistantError::Auth(_) => {
                "One of my service credentials was rejected. Please check the configuration."
            }
            AssistantError::RateLimited(_) => {
                "I'm being rate limited right now. Please try again shortly."
            }
            AssistantError::Provider(_) => {
                "Something went wrong talking to a service. Please try again."
            }
            AssistantError::Download(_) => "Sorry, I couldn't download that file.",
            AssistantError::Parse(_) => "Sorry, I couldn't read that document.",
            AssistantError::Extraction(_) => {
                "I couldn't work out all the appointment details. Please rephrase with a title, date, time and duration."
            }
            AssistantError::CalendarUnauthorized => {
                "The calendar isn't connected yet. Please authorize it first."
            }
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            AssistantError::from_status(StatusCode::UNAUTHORIZED, "bad key".into()),
            AssistantError::Auth(_)
        ));
        assert!(matches!(
            AssistantError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            AssistantError::RateLimited(_)
        ));
        assert!(matches!(
            AssistantError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            AssistantError::Provider(_)
        ));
    }

    #[test]
    fn test_user_message_hides_detail() {
        let err = AssistantError::Provider("secret payload from provider".to_string());
        assert!(!err.user_message().contains("secret"));
    }
}

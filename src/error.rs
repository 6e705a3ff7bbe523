// src/error.rs
use thiserror::Error;

/// Shown in the chat log when the conversational call fails for any reason.
pub const SERVICE_ERROR_MESSAGE: &str = "حدث خطأ أثناء الاتصال بالخادم. يرجى المحاولة مرة أخرى.";

/// Shown as a blocking alert when a practice question could not be produced.
pub const PRACTICE_ERROR_MESSAGE: &str = "حدث خطأ أثناء تحميل السؤال. حاول مرة أخرى.";

/// Transport-level failures of the Gemini REST client.
///
/// These never leave the gateway; they are logged and normalized into [`ApexError`].
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced to the session layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApexError {
    /// The freeform conversational call failed.
    #[error("{message}")]
    Service { message: String },
    /// The structured practice-question call failed at the transport level.
    #[error("Failed to generate practice question")]
    Generation,
    /// The structured call succeeded but its payload is not a valid practice question.
    #[error("Malformed practice question: {reason}")]
    MalformedResponse { reason: String },
}

impl ApexError {
    pub fn service() -> Self {
        ApexError::Service {
            message: SERVICE_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        ApexError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Localized text for the user. Generation and malformed responses share one
    /// message since both recover the same way.
    pub fn user_message(&self) -> &str {
        match self {
            ApexError::Service { message } => message,
            ApexError::Generation | ApexError::MalformedResponse { .. } => PRACTICE_ERROR_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_displays_localized_message() {
        let err = ApexError::service();
        assert_eq!(err.to_string(), SERVICE_ERROR_MESSAGE);
        assert_eq!(err.user_message(), SERVICE_ERROR_MESSAGE);
    }

    #[test]
    fn test_practice_errors_share_user_message() {
        assert_eq!(ApexError::Generation.user_message(), PRACTICE_ERROR_MESSAGE);
        assert_eq!(
            ApexError::malformed("missing field `question`").user_message(),
            PRACTICE_ERROR_MESSAGE
        );
    }
}

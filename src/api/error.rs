use reqwest::StatusCode;
use thiserror::Error;

const RATE_LIMIT_MESSAGE: &str =
    "The AI service is receiving too many requests. Please wait a moment and try again.";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch workout plan";
const RAW_RESPONSE_PREVIEW_CHARS: usize = 100;

/// Plan generation errors
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Plan service returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        raw_response: Option<String>,
    },

    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Plan cache error: {0}")]
    Cache(String),
}

impl PlanError {
    pub fn from_status(status: StatusCode, message: String, raw_response: Option<String>) -> Self {
        let msg = if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string()
        } else {
            message
        };

        // The plan service relays upstream 429s as a 500 with a rate-limit message
        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || msg.to_lowercase().contains("rate limit");

        match status {
            _ if rate_limited => PlanError::RateLimited(msg),
            status => PlanError::Upstream {
                status: status.as_u16(),
                message: msg,
                raw_response,
            },
        }
    }

    /// Text surfaced next to the fallback plan
    pub fn user_message(&self) -> String {
        match self {
            PlanError::RateLimited(_) => RATE_LIMIT_MESSAGE.to_string(),
            PlanError::Upstream {
                message,
                raw_response: Some(raw),
                ..
            } => {
                let preview: String = raw.chars().take(RAW_RESPONSE_PREVIEW_CHARS).collect();
                format!("{} Raw: {}...", message, preview)
            }
            PlanError::Upstream { message, .. } => message.clone(),
            PlanError::MalformedPlan(_) => {
                "AI response was not in the expected format. Please try again.".to_string()
            }
            PlanError::Network(_) | PlanError::Cache(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for PlanError {
    fn from(err: reqwest::Error) -> Self {
        PlanError::Network(err.to_string())
    }
}

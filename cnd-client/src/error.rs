use crate::{payload::IncompletePayload, problem::Problem, request::ConversionError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cnd responded with a problem: {0}")]
    Problem(#[from] Problem),
    #[error("response of cnd is missing field {field}")]
    MissingField { field: &'static str },
    #[error("cnd did not return the location of the created resource")]
    MissingLocation,
    #[error("expected cnd to respond with status {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("failed to decode response of cnd")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL")]
    Url(#[from] url::ParseError),
    #[error("failed to convert action")]
    Conversion(#[from] ConversionError),
    #[error("refusing to submit incomplete payload")]
    IncompletePayload(#[from] IncompletePayload),
    #[error("action {action} is not available in state {state}")]
    ActionNotAvailable { action: String, state: String },
    #[error(
        "swap at {url} did not reach state {expected} within {timeout_ms}ms, \
         last seen in state {last_seen}"
    )]
    PollTimeout {
        url: String,
        expected: String,
        last_seen: String,
        timeout_ms: u128,
    },
}

impl Error {
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Error::Problem(problem) => Some(problem),
            _ => None,
        }
    }
}

use thiserror::Error;

/// Errors raised by the subtitle clock codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid timestamp '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: &'static str },
}

impl TimeError {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        TimeError::InvalidTimestamp {
            input: input.to_string(),
            reason,
        }
    }
}

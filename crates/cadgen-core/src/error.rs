use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::service::ServiceError;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to submit generation request: {0}")]
    SubmissionFailed(#[source] ServiceError),

    #[error("status poll {poll} failed: {source}")]
    PollingFailed {
        poll: u32,
        #[source]
        source: ServiceError,
    },

    #[error("generation did not finish after {polls} polls ({}s)", waited.as_secs())]
    Timeout { polls: u32, waited: Duration },

    #[error("text-to-CAD failed: {0}")]
    GenerationFailed(String),

    #[error("generation completed but returned no output files")]
    EmptyResult,

    #[error("generation cancelled after {polls} polls")]
    Cancelled { polls: u32 },
}

/// Classification of a failed generation, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    SubmissionFailed,
    PollingFailed,
    Timeout,
    GenerationFailed,
    EmptyResult,
    Cancelled,
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::SubmissionFailed(_) => ErrorKind::SubmissionFailed,
            Self::PollingFailed { .. } => ErrorKind::PollingFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::GenerationFailed(_) => ErrorKind::GenerationFailed,
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::SubmissionFailed => "SubmissionFailed",
            Self::PollingFailed => "PollingFailed",
            Self::Timeout => "Timeout",
            Self::GenerationFailed => "GenerationFailed",
            Self::EmptyResult => "EmptyResult",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_keeps_message() {
        let err = GenerationError::GenerationFailed("bad prompt".into());
        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
        assert_eq!(err.to_string(), "text-to-CAD failed: bad prompt");
    }

    #[test]
    fn test_timeout_message_reports_wait() {
        let err = GenerationError::Timeout {
            polls: 60,
            waited: Duration::from_secs(300),
        };
        assert_eq!(err.to_string(), "generation did not finish after 60 polls (300s)");
        assert_eq!(err.kind().to_string(), "Timeout");
    }

    #[test]
    fn test_polling_failure_exposes_source() {
        use std::error::Error as _;

        let err = GenerationError::PollingFailed {
            poll: 3,
            source: ServiceError::Transport("connection reset".into()),
        };
        assert_eq!(err.kind(), ErrorKind::PollingFailed);
        assert!(err.source().is_some());
    }
}

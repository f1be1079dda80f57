use cadgen_core::{ErrorKind, GenerationError};
use cadgen_zoo::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to save the CAD file: {0:#}")]
    Staging(anyhow::Error),

    #[error("generation worker stopped unexpectedly: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Short label printed in front of the error message
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generation(err) => err.kind().name(),
            Self::Config(_) => "Config",
            Self::Staging(_) => "Staging",
            Self::Worker(_) => "Internal",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Generation(err) => match err.kind() {
                ErrorKind::InvalidInput => 2,
                ErrorKind::SubmissionFailed => 3,
                ErrorKind::PollingFailed => 4,
                ErrorKind::Timeout => 5,
                ErrorKind::GenerationFailed => 6,
                ErrorKind::EmptyResult => 7,
                ErrorKind::Cancelled => 130,
            },
            Self::Config(_) | Self::Staging(_) | Self::Worker(_) => 1,
        }
    }

    /// What the user can do about it
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Generation(err) => match err.kind() {
                ErrorKind::InvalidInput => {
                    Some("Describe the part you want and pick a format of 'step' or 'stl'.")
                }
                ErrorKind::SubmissionFailed => {
                    Some("Check your API token (ZOO_API_TOKEN) and your network connection.")
                }
                ErrorKind::PollingFailed => {
                    Some("The service stopped answering status checks; try again shortly.")
                }
                ErrorKind::Timeout => {
                    Some("Try again, simplify the prompt, or raise --max-polls to wait longer.")
                }
                ErrorKind::GenerationFailed => {
                    Some("Rephrase the prompt with concrete shapes and dimensions.")
                }
                ErrorKind::EmptyResult => Some("The service returned no files; try again."),
                ErrorKind::Cancelled => None,
            },
            Self::Config(_) => Some("Add ZOO_API_TOKEN to your environment or to a .env file."),
            Self::Staging(_) => Some("Check that the output directory is writable."),
            Self::Worker(_) => None,
        }
    }
}

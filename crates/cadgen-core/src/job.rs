use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model_types::OutputFormat;

/// Identifier the service assigns to a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed { outputs: BTreeMap<String, Vec<u8>> },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// File produced by a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    /// Output key the payload was taken from
    pub source_key: String,
    /// Set when the expected key was missing and `source_key` is a substitute
    pub fallback: bool,
}

impl GeneratedArtifact {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback
    }
}

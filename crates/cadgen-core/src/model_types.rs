use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// File formats the text-to-CAD service can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Step,
    Stl,
}

impl OutputFormat {
    /// Lowercase file extension, also used as the API path segment
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Step => "step",
            Self::Stl => "stl",
        }
    }

    /// Key the service uses for this format in a completed job's outputs
    pub fn output_key(&self) -> String {
        format!("source.{}", self.extension())
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Step => "STEP (ISO 10303) solid model",
            Self::Stl => "STL triangle mesh",
        }
    }

    /// All supported formats
    pub fn all() -> [OutputFormat; 2] {
        [Self::Step, Self::Stl]
    }

    /// Infer the format from a file path's extension.
    ///
    /// Returns `Ok(None)` when the path has no extension and
    /// [`GenerationError::InvalidInput`] for an unsupported one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Option<Self>, GenerationError> {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().parse())
            .transpose()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "step" => Ok(Self::Step),
            "stl" => Ok(Self::Stl),
            other => Err(GenerationError::InvalidInput(format!(
                "unsupported output format '{other}' (expected one of: step, stl)"
            ))),
        }
    }
}

/// One text-to-CAD generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    output_format: OutputFormat,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, output_format: OutputFormat) -> Self {
        Self {
            prompt: prompt.into(),
            output_format,
        }
    }

    /// Build a request from a raw format name.
    ///
    /// A missing format falls back to STEP; a supplied but unknown one is rejected.
    pub fn parse(prompt: impl Into<String>, format: Option<&str>) -> Result<Self, GenerationError> {
        let output_format = match format {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };
        let request = Self::new(prompt, output_format);
        request.validate()?;
        Ok(request)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput("prompt must not be empty".into()));
        }
        Ok(())
    }
}

use std::collections::BTreeMap;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use cadgen_core::{JobStatus, ServiceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextToCadCreateBody<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiCallStatus {
    Queued,
    Uploaded,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Job document returned by both the create and the status endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TextToCadJob {
    pub id: Uuid,
    pub status: ApiCallStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
    /// Output files keyed by name (`source.step`, `source.gltf`, ...), base64-encoded
    #[serde(default)]
    pub outputs: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ApiErrorBody {
    /// Service message, tagged with the request id when one was returned
    pub fn describe(&self) -> String {
        match &self.request_id {
            Some(id) => format!("{} (request {id})", self.message),
            None => self.message.clone(),
        }
    }
}

impl TextToCadJob {
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "unknown error".to_string())
    }

    /// Classify the document into the orchestrator's view of a job.
    pub fn into_status(self) -> Result<JobStatus, ServiceError> {
        match self.status {
            ApiCallStatus::Failed => Ok(JobStatus::Failed {
                message: self.failure_message(),
            }),
            ApiCallStatus::Completed => {
                let outputs = self
                    .outputs
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, encoded)| decode_output(&key, &encoded).map(|bytes| (key, bytes)))
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Ok(JobStatus::Completed { outputs })
            }
            status if self.completed_at.is_some() => Err(ServiceError::Malformed(format!(
                "job {} has a completion time but status {status:?}",
                self.id
            ))),
            _ => Ok(JobStatus::Pending),
        }
    }
}

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// URL-safe alphabet, padding optional
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

fn decode_output(key: &str, encoded: &str) -> Result<Vec<u8>, ServiceError> {
    let encoded = encoded.trim();
    STANDARD_LENIENT
        .decode(encoded)
        .or_else(|_| URL_SAFE_LENIENT.decode(encoded))
        .map_err(|e| ServiceError::Malformed(format!("output '{key}' is not valid base64: {e}")))
}

//! Submit a text-to-CAD job, poll it to a terminal state and pick the
//! output file.
//!
//! The orchestrator keeps no state between calls: every `generate` owns its
//! own job handle and poll counter, so one instance can serve many
//! independent requests.

use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::job::{GeneratedArtifact, JobHandle, JobStatus};
use crate::model_types::{GenerationRequest, OutputFormat};
use crate::progress::{NoopProgress, ProgressSink, polling_fraction};
use crate::service::RemoteCadService;

/// Longest uninterrupted sleep between cancellation checks
const CANCEL_CHECK_SLICE: Duration = Duration::from_millis(100);

/// How often and how long to poll a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    interval: Duration,
    max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_polls: 60,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_polls: u32) -> Result<Self, GenerationError> {
        if max_polls == 0 {
            return Err(GenerationError::InvalidInput(
                "poll cap must be at least one poll".into(),
            ));
        }
        Ok(Self { interval, max_polls })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Upper bound on time spent waiting between polls
    pub fn total_budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_polls)
    }
}

pub struct JobOrchestrator<S> {
    service: S,
    config: PollConfig,
    progress: Box<dyn ProgressSink + Send + Sync>,
}

impl<S: RemoteCadService> JobOrchestrator<S> {
    pub fn new(service: S, config: PollConfig) -> Self {
        Self {
            service,
            config,
            progress: Box::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, sink: impl ProgressSink + Send + Sync + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, GenerationError> {
        self.generate_with_cancel(request, &CancellationToken::new())
    }

    /// Like [`generate`](Self::generate), but gives up with
    /// [`GenerationError::Cancelled`] once `cancel` fires.
    pub fn generate_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedArtifact, GenerationError> {
        request.validate()?;
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled { polls: 0 });
        }

        let format = request.output_format();
        self.progress.report(0.0, "Submitting your design prompt to the API...");

        let handle = self
            .service
            .submit(request)
            .map_err(GenerationError::SubmissionFailed)?;
        info!(job_id = %handle, %format, "Submitted text-to-CAD job");

        let outputs = self.poll_until_terminal(&handle, cancel)?;
        self.progress.report(1.0, "CAD model completed! Preparing download...");

        extract_artifact(format, outputs)
    }

    fn poll_until_terminal(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, Vec<u8>>, GenerationError> {
        let max_polls = self.config.max_polls;

        for poll in 1..=max_polls {
            if !wait_unless_cancelled(self.config.interval, cancel) {
                info!(job_id = %handle, polls = poll - 1, "Job abandoned by caller");
                return Err(GenerationError::Cancelled { polls: poll - 1 });
            }

            let status = self
                .service
                .fetch_status(handle)
                .map_err(|source| GenerationError::PollingFailed { poll, source })?;
            debug!(job_id = %handle, poll, status = status.label(), "Polled job status");

            match status {
                JobStatus::Pending => {
                    self.progress.report(
                        polling_fraction(poll, max_polls),
                        "Generating your CAD model... (this may take a minute)",
                    );
                }
                JobStatus::Failed { message } => {
                    return Err(GenerationError::GenerationFailed(message));
                }
                JobStatus::Completed { outputs } => {
                    info!(job_id = %handle, poll, outputs = outputs.len(), "Job completed");
                    return Ok(outputs);
                }
            }
        }

        Err(GenerationError::Timeout {
            polls: max_polls,
            waited: self.config.total_budget(),
        })
    }
}

/// Sleep for `interval`, waking early if `cancel` fires. Returns `false` when cancelled.
///
/// An interval too large to represent as an `Instant` never elapses.
fn wait_unless_cancelled(interval: Duration, cancel: &CancellationToken) -> bool {
    let deadline = Instant::now().checked_add(interval);
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => CANCEL_CHECK_SLICE,
        };
        if remaining.is_zero() {
            return true;
        }
        thread::sleep(remaining.min(CANCEL_CHECK_SLICE));
    }
}

/// Pick the payload for `format`, falling back to the first available output.
fn extract_artifact(
    format: OutputFormat,
    mut outputs: BTreeMap<String, Vec<u8>>,
) -> Result<GeneratedArtifact, GenerationError> {
    let expected = format.output_key();
    if let Some(bytes) = outputs.remove(&expected) {
        return Ok(GeneratedArtifact {
            format,
            bytes,
            source_key: expected,
            fallback: false,
        });
    }

    let (key, bytes) = outputs.pop_first().ok_or(GenerationError::EmptyResult)?;
    warn!(
        expected = %expected,
        used = %key,
        "Expected output missing from completed job, using fallback output",
    );

    Ok(GeneratedArtifact {
        format,
        bytes,
        source_key: key,
        fallback: true,
    })
}

/// Receives human-readable progress while a job runs.
///
/// Reporting is fire-and-forget; implementations must not fail the job.
pub trait ProgressSink {
    fn report(&self, fraction: f32, message: &str);
}

/// Sink for callers that do not display progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _fraction: f32, _message: &str) {}
}

impl<F> ProgressSink for F
where
    F: Fn(f32, &str),
{
    fn report(&self, fraction: f32, message: &str) {
        self(fraction, message)
    }
}

pub(crate) const PENDING_CEILING: f32 = 0.9;

/// Progress fraction while a job is still pending, capped below completion
pub(crate) fn polling_fraction(polls: u32, max_polls: u32) -> f32 {
    if max_polls == 0 {
        return 0.0;
    }
    (polls as f32 / max_polls as f32).clamp(0.0, PENDING_CEILING)
}

pub mod error;
pub mod job;
mod model_types;
pub mod orchestrator;
pub mod progress;
pub mod service;

pub use error::{ErrorKind, GenerationError};
pub use job::{GeneratedArtifact, JobHandle, JobStatus};
pub use model_types::{GenerationRequest, OutputFormat};
pub use orchestrator::{JobOrchestrator, PollConfig};
pub use progress::{NoopProgress, ProgressSink};
pub use service::{RemoteCadService, ServiceError};
pub use tokio_util::sync::CancellationToken;

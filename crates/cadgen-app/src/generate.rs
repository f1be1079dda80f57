use std::path::{Path, PathBuf};

use cadgen_core::{
    CancellationToken, GeneratedArtifact, GenerationError, GenerationRequest, JobOrchestrator,
    OutputFormat,
};
use cadgen_zoo::ZooClient;
use clap::Args;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, PollOverrides};
use crate::error::AppError;
use crate::progress::LogProgress;
use crate::staging::stage_artifact;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Description of the part to generate
    pub prompt: String,

    /// Output format: step or stl (inferred from --output when omitted)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Where to save the file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name without extension, used when --output is not given
    #[arg(short, long, default_value = "output")]
    pub name: String,

    /// Seconds between status checks
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Number of status checks before giving up
    #[arg(long)]
    pub max_polls: Option<u32>,
}

#[derive(Debug)]
pub struct GenerateOutcome {
    pub path: PathBuf,
    pub artifact: GeneratedArtifact,
}

pub async fn run(args: GenerateArgs) -> Result<GenerateOutcome, AppError> {
    let format = resolve_format(args.format.as_deref(), args.output.as_deref())?;
    let request = GenerationRequest::new(args.prompt, format);
    request.validate()?;

    let destination = resolve_destination(args.output.as_deref(), &args.name, format);
    let config = AppConfig::load(PollOverrides {
        interval_secs: args.poll_interval,
        max_polls: args.max_polls,
    })?;

    info!(
        %format,
        destination = %destination.display(),
        max_wait_secs = config.poll.total_budget().as_secs(),
        "Generating CAD model",
    );

    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    // the blocking HTTP client must be created and dropped off the async runtime
    let mut job = tokio::task::spawn_blocking(move || -> Result<GeneratedArtifact, AppError> {
        let client = ZooClient::new(config.zoo)?;
        debug!(base_url = client.base_url(), "Zoo client ready");
        let orchestrator =
            JobOrchestrator::new(client, config.poll).with_progress(LogProgress::default());
        Ok(orchestrator.generate_with_cancel(&request, &worker_cancel)?)
    });

    let artifact = tokio::select! {
        joined = &mut job => joined??,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    warn!("Interrupted, cancelling generation");
                    cancel.cancel();
                }
                Err(e) => warn!("Unable to listen for Ctrl-C: {e}"),
            }
            job.await??
        }
    };

    if artifact.is_degraded() {
        warn!(
            used = %artifact.source_key,
            "The service did not return a .{} file; saved its first output instead",
            artifact.extension(),
        );
    }

    let path = stage_artifact(&artifact, &destination).map_err(AppError::Staging)?;

    Ok(GenerateOutcome { path, artifact })
}

/// Decide the output format from the flag and the output path.
///
/// An explicit format wins but must agree with the output's extension.
/// Without either, STEP is used.
pub fn resolve_format(
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<OutputFormat, GenerationError> {
    let from_path = match output.filter(|path| !is_directory(path)) {
        Some(path) => OutputFormat::from_path(path)?,
        None => None,
    };

    match (format.map(str::parse::<OutputFormat>).transpose()?, from_path) {
        (Some(flag), Some(path)) if flag != path => Err(GenerationError::InvalidInput(format!(
            "--format {flag} does not match the .{path} output file"
        ))),
        (Some(flag), _) => Ok(flag),
        (None, Some(path)) => Ok(path),
        (None, None) => Ok(OutputFormat::default()),
    }
}

/// Final path of the saved file.
///
/// A directory output (existing, or written with a trailing separator)
/// receives `<name>.<ext>` inside it.
pub fn resolve_destination(output: Option<&Path>, name: &str, format: OutputFormat) -> PathBuf {
    let file_name = format!("{name}.{}", format.extension());
    match output {
        Some(path) if is_directory(path) => path.join(file_name),
        Some(path) if path.extension().is_some() => path.to_path_buf(),
        Some(path) => path.with_extension(format.extension()),
        None => PathBuf::from(file_name),
    }
}

fn is_directory(path: &Path) -> bool {
    path.is_dir() || path.as_os_str().to_string_lossy().ends_with(std::path::is_separator)
}

//! Structured telemetry for soak runs.
//!
//! One JSON record per line goes to `<run_id>.telemetry.jsonl` beside the game
//! rows. The engines log under `fish_core::belief` and get their own level, so a
//! `debug` harness run does not drown in per-event propagation records.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

const ENGINE_TARGET: &str = "fish_core::belief";

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Telemetry file for `run_id`, in the directory of the JSONL game rows.
pub fn telemetry_path(run_id: &str, outputs: &ResolvedOutputs) -> PathBuf {
    let dir = outputs
        .jsonl
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("{run_id}.telemetry.jsonl"))
}

/// Default filter: the harness level everywhere, the engine level for engine records.
pub fn filter_directives(logging: &LoggingConfig) -> Result<String> {
    let harness = logging
        .level()
        .ok_or_else(|| anyhow!("unknown tracing level '{}'", logging.tracing_level))?;
    let engine = logging
        .engine_level()
        .ok_or_else(|| anyhow!("unknown engine level '{}'", logging.engine_level))?;
    Ok(format!(
        "{},{ENGINE_TARGET}={}",
        lowercase(harness),
        lowercase(engine)
    ))
}

fn lowercase(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Installs the JSON subscriber when structured logging is enabled.
///
/// `RUST_LOG` replaces the configured directives entirely.
pub fn init_logging(
    run_id: &str,
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = telemetry_path(run_id, outputs);
    if let Some(dir) = telemetry_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

    let directives = filter_directives(logging)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .with_current_span(false)
        .with_writer(writer)
        .finish();

    // Tests may have installed one already.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

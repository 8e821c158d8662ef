use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize tracing into `log_file`.
///
/// The terminal belongs to the UI, so without a log file nothing is
/// installed and events are dropped. `RUST_LOG` overrides the default
/// filter. Keep the returned guard alive until exit so buffered lines flush.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let default_filter = if verbose {
        "imgslider=trace,warn"
    } else {
        "imgslider=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("log path has no file name: {}", path.display()))?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(Some(guard))
}

//! Tracing subscriber setup.

use grizzly_core::config::{LogConfig, LogFormat, Rolling};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Run `f` with a temporary stdout subscriber at `info` (or `RUST_LOG`).
///
/// Covers work that happens before the configured subscriber exists, such as
/// loading the config file that describes it.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::with_default(bootstrap_subscriber(filter, std::io::stdout), f)
}

fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish()
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `level`. When logging to a file the returned guard
/// must be held until shutdown so buffered lines are flushed.
pub fn init(config: &LogConfig, level: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.stdout {
        match config.format {
            LogFormat::Full => builder.init(),
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Pretty => builder.pretty().init(),
            LogFormat::Json => builder.json().init(),
        }
        return None;
    }

    let appender = match config.rolling {
        Rolling::Minutely => rolling::minutely(&config.directory, &config.file_name),
        Rolling::Hourly => rolling::hourly(&config.directory, &config.file_name),
        Rolling::Daily => rolling::daily(&config.directory, &config.file_name),
        Rolling::Never => rolling::never(&config.directory, &config.file_name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let builder = builder.with_writer(writer).with_ansi(false);

    match config.format {
        LogFormat::Full => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
    Some(guard)
}

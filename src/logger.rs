//! Initializes the tracing subscriber from [`config::Logger`].
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::{config, Error, Result};

// Crates whose events pass the default filter.
const MODULE_WHITELIST: &[&str] = &["ontosim"];

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_PREFIX: &str = "ontosim.log";

// Dropping the guard stops the background writer, so it lives for the
// whole process.
static NONBLOCKING_WORK_GUARD_KEEP: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber.
///
/// Nothing is installed when both stdout logging and the file appender are
/// disabled.
///
/// # Errors
///
/// Fails when the file appender cannot be created, when the filter
/// directives are invalid, or when a global subscriber is already set.
pub fn init(config: &config::Logger) -> Result<()> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Sync + Send>> = Vec::new();

    if let Some(file_appender_config) = config.file_appender.as_ref() {
        if file_appender_config.enable {
            let rotation = match file_appender_config.rotation {
                config::Rotation::Minutely => tracing_appender::rolling::Rotation::MINUTELY,
                config::Rotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
                config::Rotation::Daily => tracing_appender::rolling::Rotation::DAILY,
                config::Rotation::Never => tracing_appender::rolling::Rotation::NEVER,
            };

            let dir = file_appender_config
                .dir
                .as_deref()
                .unwrap_or(DEFAULT_LOG_DIR);
            let file_appender = tracing_appender::rolling::Builder::default()
                .rotation(rotation)
                .max_log_files(file_appender_config.max_log_files)
                .filename_prefix(
                    file_appender_config
                        .filename_prefix
                        .as_deref()
                        .unwrap_or(DEFAULT_LOG_PREFIX),
                )
                .filename_suffix(
                    file_appender_config
                        .filename_suffix
                        .as_deref()
                        .unwrap_or_default(),
                )
                .build(dir)
                .map_err(|err| Error::Message(format!("logger file appender failed: {err}")))?;

            let file_appender_layer = if file_appender_config.non_blocking {
                let (non_blocking_file_appender, work_guard) =
                    tracing_appender::non_blocking(file_appender);
                if NONBLOCKING_WORK_GUARD_KEEP.set(work_guard).is_err() {
                    return Err(Error::Message(
                        "logger non-blocking writer already initialized".to_string(),
                    ));
                }
                init_layer(
                    non_blocking_file_appender,
                    &file_appender_config.format,
                    false,
                )
            } else {
                init_layer(file_appender, &file_appender_config.format, false)
            };
            layers.push(file_appender_layer);
        }
    }

    if config.enable {
        layers.push(init_layer(std::io::stdout, &config.format, true));
    }

    if layers.is_empty() {
        return Ok(());
    }

    let env_filter = init_env_filter(config.override_filter.as_ref(), &config.level)?;
    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(Error::wrap)
}

fn init_env_filter(
    override_filter: Option<&String>,
    level: &config::LogLevel,
) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = override_filter.map_or_else(|| default_directives(level), Clone::clone);
    EnvFilter::try_new(directives).map_err(Error::wrap)
}

fn default_directives(level: &config::LogLevel) -> String {
    MODULE_WHITELIST
        .iter()
        .map(|module| format!("{module}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_layer<W2>(
    make_writer: W2,
    format: &config::Format,
    ansi: bool,
) -> Box<dyn Layer<Registry> + Sync + Send>
where
    W2: for<'writer> MakeWriter<'writer> + Sync + Send + 'static,
{
    match format {
        config::Format::Compact => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .compact()
            .boxed(),
        config::Format::Pretty => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .pretty()
            .boxed(),
        config::Format::Json => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .json()
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::default_directives;
    use crate::config::LogLevel;

    #[test]
    fn default_filter_targets_the_crate() {
        assert_eq!(default_directives(&LogLevel::Debug), "ontosim=debug");
        assert_eq!(default_directives(&LogLevel::Off), "ontosim=off");
    }
}

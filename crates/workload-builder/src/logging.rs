//! Subscriber setup for binaries that embed this crate. The builders themselves only emit events.
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

type Result<T, E = Error> = std::result::Result<T, E>;

const MAX_LOG_FILES: usize = 6;
const FILE_LOG_SUFFIX: &str = "tracing-rs.json";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to initialize rolling file appender in {directory:?}"))]
    InitRollingFileAppender {
        source: InitError,
        directory: PathBuf,
    },

    #[snafu(display("failed to install the global tracing subscriber"))]
    InstallSubscriber { source: TryInitError },
}

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// If the variable is unset or can not be parsed, the maximum log level is set to INFO.
///
/// Setting `{env}_DIRECTORY` (e.g. `WEBSERVER_LOG_DIRECTORY`) to a directory additionally writes
/// JSON lines to hourly rotated files named after `app_name` in that directory.
pub fn initialize_logging(env: &str, app_name: &str) -> Result<()> {
    let log_directory = std::env::var_os(format!("{env}_DIRECTORY")).map(PathBuf::from);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        tracing_subscriber::fmt::layer()
            .with_filter(env_filter(env))
            .boxed(),
    ];
    if let Some(directory) = &log_directory {
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_appender(directory, app_name)?)
                .with_filter(env_filter(env))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context(InstallSubscriberSnafu)?;

    // need to delay logging until after tracing is initialized
    if let Some(directory) = log_directory {
        tracing::info!(directory = %directory.display(), "file logging enabled");
    } else {
        tracing::debug!("file logging disabled, because no log directory set");
    }
    Ok(())
}

fn env_filter(env: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(env)
        .from_env_lossy()
}

fn file_appender(directory: &Path, app_name: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(app_name)
        .filename_suffix(FILE_LOG_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(directory)
        .context(InitRollingFileAppenderSnafu { directory })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_log_directory_is_reported() {
        let directory = Path::new("/dev/null/logs");

        assert!(matches!(
            file_appender(directory, "workload-builder"),
            Err(Error::InitRollingFileAppender { directory: reported, .. }) if reported == directory
        ));
    }

    #[test]
    fn second_initialization_fails() {
        let env = "WORKLOAD_BUILDER_TEST_LOG";
        // Only one global subscriber can be installed per process, whichever test gets there
        // first wins.
        let _ = initialize_logging(env, "workload-builder");

        assert!(matches!(
            initialize_logging(env, "workload-builder"),
            Err(Error::InstallSubscriber { .. })
        ));
    }
}

//! tracing subscriber setup.
//!
//! Filter resolution: `AGENTDOCK_LOG`, then `log.filter` from config, then
//! `warn`.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogConfig;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "AGENTDOCK_LOG";

const DEFAULT_FILTER: &str = "warn";
const LOG_FILE_PREFIX: &str = "agentdock.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Plain stderr, for headless commands.
    Stderr,
    /// Daily-rolling file in the given directory, for the terminal UI.
    File(PathBuf),
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the background writer. Returns `None` for
/// [`LogTarget::Stderr`], which writes synchronously.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(target: LogTarget, config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = resolve_filter(std::env::var(LOG_ENV).ok().as_deref(), config);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_target(false),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .context("Failed to install log subscriber")?;
            Ok(Some(guard))
        }
    }
}

/// Picks the first usable directive. Unparseable values fall through.
fn resolve_filter(env_value: Option<&str>, config: &LogConfig) -> EnvFilter {
    [env_value, config.filter.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filter: Option<&str>) -> LogConfig {
        LogConfig {
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn test_env_wins_over_config() {
        let filter = resolve_filter(Some("debug"), &config(Some("error")));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_config_used_when_env_blank() {
        let filter = resolve_filter(Some("  "), &config(Some("agentdock_core=info")));
        assert_eq!(filter.to_string(), "agentdock_core=info");
    }

    #[test]
    fn test_defaults_to_warn() {
        let filter = resolve_filter(None, &config(None));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_invalid_directive_falls_through() {
        let filter = resolve_filter(Some("agentdock=loud"), &config(Some("info")));
        assert_eq!(filter.to_string(), "info");
    }
}

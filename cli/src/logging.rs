//! # Logging
//!
//! `tracing` subscriber setup for the binary. Logs go to stderr and stdout
//! carries command output only, so a serialized blob can be piped straight
//! into another tool. `RUST_LOG` takes precedence over `--log-level`.

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line records.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

impl LogFormat {
    /// `"json"` in any case selects [`LogFormat::Json`]; anything else is
    /// [`LogFormat::Pretty`].
    pub fn from_str_lossy(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Filter from `RUST_LOG`, or from `default_directive` when it is unset or
/// does not parse.
fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber. Only the first call in a process has an
/// effect.
///
/// `default_directive` is an `EnvFilter` directive such as `"warn"` or
/// `"ripple_sign_serialize=debug"`.
pub fn init_logging(default_directive: &str, format: LogFormat) {
    let filter = build_filter(default_directive);
    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal())
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr).with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(?format, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_is_lossy() {
        assert_eq!(LogFormat::from_str_lossy("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("xml"), LogFormat::Pretty);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn second_init_is_harmless() {
        init_logging("warn", LogFormat::Pretty);
        init_logging("debug", LogFormat::Json);
    }
}

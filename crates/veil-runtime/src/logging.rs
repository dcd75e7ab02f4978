#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! Every crate in the workspace emits `tracing` events with a dotted
//! `message` key (`overlay.show`, `app.reset`, ...). Hosts that do not install
//! their own subscriber can call [`init`] once at startup.
//!
//! The filter comes from the `VEIL_LOG` environment variable using
//! `EnvFilter` directive syntax (e.g. `VEIL_LOG=veil_overlay=trace`), falling
//! back to `debug` or `info` depending on the `debug` flag.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "VEIL_LOG";

/// Output format of [`init_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Build the filter: `VEIL_LOG` when set and valid, else `fallback`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a human-readable subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(debug: bool) -> bool {
    init_with(debug, LogFormat::Pretty)
}

/// Install a subscriber with the given output format.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with(debug: bool, format: LogFormat) -> bool {
    let filter = env_filter(if debug { "debug" } else { "info" });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(message = "logging.init", ?format);
    }
    installed
}

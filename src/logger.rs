//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggerSettings};

/// Installs the global subscriber described by `settings`.
///
/// `RUST_LOG` overrides the configured level. Returns `false` when logging
/// is disabled or a subscriber was already installed, so repeated calls from
/// tests or embedding applications are harmless.
pub fn init(settings: &LoggerSettings) -> bool {
    if !settings.enable {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = match settings.format {
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .is_ok()
}

//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `default_level`.
///
/// Call once at process startup. Stdout stays free for report output.
/// A second call is a no-op.
pub fn init(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

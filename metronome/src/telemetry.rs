// Structured logging initialization.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global tracing subscriber with an env-filter and a formatted
/// output layer.
///
/// `log_level` is the fallback filter when `RUST_LOG` is unset. Returns an
/// error if the host already installed a subscriber, so embedding
/// applications that bring their own logging keep it.
pub fn init_logging(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    tracing::debug!(log_level = log_level, "logging initialized");
    Ok(())
}

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Log lines go to stderr so board output on
/// stdout stays clean; `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "jotinha=debug" } else { "jotinha=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to init tracing subscriber: {e}"))?;

    Ok(())
}

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// Diagnostics go to stderr so they never mix with command output. The level
/// comes from `RUST_LOG`, falling back to `default_directive` (e.g. "warn").
pub fn init(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

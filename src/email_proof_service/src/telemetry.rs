use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the `color_eyre` report handler and a global subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Fails if a
/// subscriber or report handler is already installed.
pub fn init_tracing() -> Result<()> {
    color_eyre::install()?;

    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

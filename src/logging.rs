use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured default.
pub fn build_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter: {default_filter}")),
    }
}

pub fn init(default_filter: &str) -> Result<()> {
    let filter = build_filter(default_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions));

    // The browser has no system clock for the default timer.
    #[cfg(target_arch = "wasm32")]
    let result = builder.without_time().try_init();
    #[cfg(not(target_arch = "wasm32"))]
    let result = builder.try_init();

    result.map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let result = EnvFilter::try_new("info,nomenclature=debug");

        assert!(result.is_ok(), "default filter should parse: {result:?}");
    }

    #[test]
    fn malformed_filter_is_reported() {
        let result = EnvFilter::try_new("nomenclature=loud");

        assert!(result.is_err(), "unknown level should not parse");
    }
}

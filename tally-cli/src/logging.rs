use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Output goes to stderr so `--json` stays
/// parseable on stdout. `RUST_LOG` overrides `level` when set.
pub fn setup_logging(level: &str) -> Result<()> {
    let level = normalize_level(level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;

    Ok(())
}

/// Map loose level names onto tracing's; unknown names fall back to `info`.
pub fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        "off" | "quiet" => "off",
        _ => "info",
    }
}

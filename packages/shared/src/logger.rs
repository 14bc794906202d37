//! Logger setup backed by `tracing-subscriber`.

use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a log level string, falling back to `INFO` for unknown input.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the default filter directive for a binary and the library crates
/// it wants to see logs from.
///
/// Binary names use hyphens while tracing targets use underscores, so
/// `hiroba-channel-demo` with `["hiroba_channel"]` and `debug` becomes
/// `hiroba_channel_demo=debug,hiroba_channel=debug`.
pub fn default_directive(bin_name: &str, lib_targets: &[&str], level: &str) -> String {
    let level = parse_level(level).as_str().to_lowercase();
    std::iter::once(bin_name)
        .chain(lib_targets.iter().copied())
        .map(|target| format!("{}={level}", target.replace('-', "_")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when it is set.
pub fn setup_logger(bin_name: &str, lib_targets: &[&str], default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directive(bin_name, lib_targets, default_level))
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .init();
}

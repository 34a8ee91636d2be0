use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Configure and initialize logging to stderr.
///
/// RUST_LOG wins when set. Otherwise rankboard targets log at `log_level`
/// (default "info", forced to "debug" by --verbose) and everything else at warn.
pub fn setup_logging(verbose: bool, log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let base_level = if verbose { "debug" } else { log_level.unwrap_or("info") };
        EnvFilter::new(format!("warn,rankboard={base_level},rankboard_core={base_level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Configure tracing once at startup for the whole process.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` (from
/// [`SystemConfig::log_filter`](super::SystemConfig)) is used.
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=storefront_ledger::actors=debug,info cargo run
/// ```
pub fn setup_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .try_init();
}

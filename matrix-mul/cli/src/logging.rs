use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber on stderr
///
/// `RUST_LOG` wins over `fallback`. Installing twice is a no-op.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Logs go to stderr so command output on stdout stays parseable. The level
/// comes from `RUST_LOG` and defaults to `warn`.
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();

    // A subscriber may already be installed when embedded in another program.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

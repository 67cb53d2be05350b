//! Thin entrypoint for the `servers` binary.

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();
    let exit_code = gpufleet_cli::run().await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Stderr logging honouring `RUST_LOG`, defaulting to `info` so the
/// post-action success logs stay visible.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

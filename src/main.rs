use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod config;
mod error;
mod ids;
mod library;
mod reply;
mod runtime;
mod session;
mod transport;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tapedeck=info"));
    // Replies go to stdout; keep logs out of the way on stderr.
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    runtime::run().await?;
    Ok(())
}

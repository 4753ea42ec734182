//! `hfrelay` HTTP server.
//!
//! ```bash
//! HF_API_KEY=hf_xxx HFRELAY_BIND=0.0.0.0:3000 cargo run --bin hfrelay
//! ```

use hfrelay::config::RelayConfig;
use hfrelay::server;
use hfrelay::telemetry::{SubscriberConfig, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_subscriber(SubscriberConfig::from_env()?)?;

    let config = RelayConfig::from_env()?;
    let app = server::app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        retry_in_handlers = config.server.retry_in_handlers,
        "hfrelay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hfrelay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

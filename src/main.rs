use anyhow::Result;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use beststories::api::{self, AppState};
use beststories::hn::{HnService, HttpTransport, DEFAULT_BASE_URL};
use beststories::logging::configure_logging;

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let base_url = env::var("HN_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    info!("Serving best stories from {}", base_url);

    let transport = Arc::new(HttpTransport::new(base_url)?);
    let service = Arc::new(HnService::new(transport));

    let shutdown = CancellationToken::new();
    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_err() {
            error!("Failed to listen for ctrl-c");
        }
        info!("Shutdown signal received");
        ctrl_c_shutdown.cancel();
    });

    api::serve(AppState { service, shutdown }, port).await
}

mod config;

use std::sync::Arc;

use tracing::{info, warn};

use clipshare_api::{AppStateInner, build_router};
use clipshare_db::StoreClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipshare=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    // Store is opened eagerly so a bad address fails at startup rather than
    // on the first request.
    let store = Arc::new(StoreClient::new(config.store.clone()));
    store.connect()?;
    info!("Store ready at {}", store.config().address);

    let app = build_router(AppStateInner::new(store.clone(), config.base_url.clone()));

    info!("ClipShare listening on {}", addr);
    if let Some(base_url) = &config.base_url {
        info!("Public base URL: {}", base_url);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = store.close() {
        warn!("Store close failed: {}", e);
    }
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

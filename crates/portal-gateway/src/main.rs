use std::sync::Arc;

use clap::Parser;
use portal_core::Shortener;
use portal_gateway::cli::{Cli, StorageBackend};
use portal_gateway::{telemetry, App, AppState};
use portal_shortener::ShortenerService;
use portal_storage::{InMemoryStore, RedisStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    let shortener: Arc<dyn Shortener> = match cli.storage {
        StorageBackend::Redis => {
            let config = cli.redis_config();
            info!(redis = %config, "connecting to redis");
            Arc::new(ShortenerService::new(RedisStore::connect(&config).await?))
        }
        StorageBackend::InMemory => {
            warn!("using in-memory storage, links are lost on restart");
            Arc::new(ShortenerService::new(InMemoryStore::new()))
        }
    };

    let app = App::router(AppState::new(shortener));
    let listener = tokio::net::TcpListener::bind(cli.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

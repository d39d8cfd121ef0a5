//! # Ticklist API Server
//!
//! Multi-user to-do list over HTTP: accounts, cookie sessions and a private
//! task list per user.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/ticklist \
//! SECRET_KEY=$(openssl rand -hex 32) \
//! cargo run -p ticklist-api
//! ```

use std::sync::Arc;
use ticklist_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use ticklist_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, PoolConfig},
    },
    store::PgStore,
};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "ticklist_api=debug,ticklist_shared=debug,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("Ticklist API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(PoolConfig {
        max_connections: config.database.max_connections,
        ..PoolConfig::new(config.database.url.clone())
    })
    .await?;

    run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store.clone(), config));

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(store.pool().clone()).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

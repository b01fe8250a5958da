use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nostr_adboard::{
    app::{build_router, AppState},
    app_config::{self, StorageBackend},
    db,
    storage::{MemStorage, PgStorage, Storage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nostr_adboard=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Arc::new(app_config::config().clone());
    info!(
        "Starting nostr-adboard ({} environment)",
        config.environment
    );

    let storage: Arc<dyn Storage> = match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage backend");
            Arc::new(MemStorage::new())
        },
        StorageBackend::Postgres => {
            info!(
                "Using PostgreSQL storage backend at {}",
                db::mask_connection_string(&config.database_url)
            );
            let pool = db::create_diesel_pool(db::DieselDatabaseConfig::default())
                .await
                .map_err(|e| anyhow::anyhow!("failed to initialize database pool: {}", e))?;

            if config.run_migrations {
                let applied = db::migrations::run_migrations(&config.database_url)
                    .await
                    .map_err(|e| anyhow::anyhow!("migration failed: {}", e))?;
                info!("Applied {} migrations", applied);
            }

            Arc::new(PgStorage::new(pool))
        },
    };

    let state = AppState::new(config.clone(), storage);
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

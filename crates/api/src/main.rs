//! Rubric Royale API Server

use common::Catalog;
use db::{MemoryStore, PgStore, Store};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rubric_royale_api=debug".parse()?)
                .add_directive("processor=debug".parse()?)
                .add_directive("db=info".parse()?),
        )
        .init();

    info!("🎮 Starting Rubric Royale API");

    // Load configuration
    let config = common::Config::from_env();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    info!(
        "📚 Catalog loaded: {} criteria, {} samples, {} badges",
        catalog.rubric.criteria.len(),
        catalog.samples.len(),
        catalog.badges.len()
    );

    let store = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            Store::Postgres(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, progress is kept in memory only");
            Store::Memory(MemoryStore::new())
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, catalog));

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! # Stockroom API Server
//!
//! HTTP server for the Stockroom inventory application:
//! signup/login with bearer-token issuance, a products catalog with
//! add-or-merge-by-SKU semantics, paginated listing, quantity updates, and
//! two analytics lookups.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/stockroom \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p stockroom-api
//! ```

use stockroom_api::app::{build_router, AppState};
use stockroom_api::config::Config;
use stockroom_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Stockroom API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let addr = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

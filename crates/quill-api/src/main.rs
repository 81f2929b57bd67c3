//! quill-api server binary.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_api::{build_router, AppState, AuthConfig};
use quill_core::CompletionBackend;
use quill_db::{create_pool, PgNoteStore};
use quill_inference::GeminiBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quill_api=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/quill".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    info!("Database connected");

    let store = Arc::new(PgNoteStore::new(pool));
    let backend = Arc::new(GeminiBackend::from_env()?);
    info!(model = backend.model_name(), "Completion backend ready");

    let auth = AuthConfig::from_env();
    let state = AppState::new(store, backend, auth);
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    info!(%addr, "Starting quill-api server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

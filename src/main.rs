//! Server: reads settings, connects the pool, ensures the items table, serves the routes.

use item_service::{app, ensure_items_table, AppState, PgItemStore, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("item_service=info,tower_http=info")),
        )
        .init();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    tracing::info!("connected to PostgreSQL");
    ensure_items_table(&pool).await?;

    let state = AppState::new(PgItemStore::new(pool));
    let router = app(state, &settings);

    let listener = TcpListener::bind(settings.bind_addr()?).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

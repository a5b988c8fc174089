//! Cake store server: loads config from env (and `.env`), prepares the database, serves `/cakes`.

use cake_store::{
    cake_routes, common_routes_with_ready, connect, ensure_database_exists, run_migrations,
    with_middleware, AppConfig, AppState, CakeService, PgCakeRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cake_store=info,tower_http=info")),
        )
        .init();
    if dotenv.is_err() {
        tracing::info!("no .env file found, using process environment");
    }

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database.connect_options()?).await?;
    let pool = connect(&config.database).await?;
    run_migrations(&pool).await?;

    let repo = Arc::new(PgCakeRepository::new(pool.clone()));
    let state = AppState {
        cakes: CakeService::new(repo),
    };

    let app = with_middleware(
        common_routes_with_ready(pool).merge(cake_routes(state)),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

pub mod error;
pub mod handlers;
pub mod pages;

use crate::storage::Storage;
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

pub fn routes(storage: Storage) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/lectura", post(handlers::create_reading))
        .route("/api/lecturas_recientes", get(handlers::recent_readings))
        .layer(CorsLayer::permissive())
        .with_state(storage)
}

pub async fn serve(listen: &str, storage: Storage) -> Result<()> {
    let app = routes(storage);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("Dashboard live at http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    signal::ctrl_c().await.expect("Ctrl-C handler");
    info!("Shutdown signal received");
}

pub mod handlers;
pub mod types;

use crate::config::Config;
use crate::engine::NnUnetEngine;
use crate::pipeline::PredictionPipeline;
use crate::storage::GcsGateway;
use crate::Result;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    // The engine is initialized exactly once per process; a missing model
    // directory aborts startup before the listener binds.
    let engine = NnUnetEngine::initialize(&config.engine).await?;
    let storage = GcsGateway::new().await?;

    let pipeline = PredictionPipeline::new(Arc::new(storage), Arc::new(engine));
    let app = router(handlers::AppState {
        pipeline: Arc::new(pipeline),
    });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

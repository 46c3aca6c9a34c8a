// src/routes/mod.rs
pub mod chat;

use crate::{config::PUBLIC_DIR, state::SharedState};
use axum::{
    Router,
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    create_router_with_public(PUBLIC_DIR)
}

/// Same as [`create_router`] but serving static files from `public_dir`.
pub fn create_router_with_public(public_dir: &str) -> Router<SharedState> {
    let api_routes = Router::new().route("/chat", post(chat_handler));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

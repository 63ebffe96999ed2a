//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.
//! When a static web directory is configured, the browser UI is served
//! from it; API routes take priority and unknown paths fall through to
//! the SPA's `index.html`. If the directory does not exist, only the API
//! is served.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState, web_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Dataset upload + preview
        .route("/datasets", post(handlers::dataset::upload_dataset))
        .route("/datasets/current", get(handlers::dataset::current_dataset))
        // Chat streaming
        .route("/chat/stream", post(handlers::chat::stream_chat))
        // Session transcript
        .route(
            "/sessions/current/messages",
            get(handlers::session::get_messages),
        )
        .route("/sessions/current", delete(handlers::session::clear_session))
        .with_state(state);

    let mut router = Router::new().nest("/api/v1", api_routes);

    if let Some(dir) = web_dir {
        let dir_path = std::path::Path::new(dir);
        if dir_path.is_dir() {
            let index = dir_path.join("index.html");
            router = router.fallback_service(
                ServeDir::new(dir_path).not_found_service(ServeFile::new(index)),
            );
        }
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

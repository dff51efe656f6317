use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::types::{AppState, ServeOptions};

pub fn router(state: AppState, opts: &ServeOptions) -> Router {
    Router::new()
        .route("/api/student-report", get(handlers::report::get_report))
        .route("/api/update-scores", put(handlers::report::update_scores))
        .fallback_service(ServeDir::new(&opts.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{catalog, reminders, watchlist, AppState};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog lookups
        .route("/search", get(catalog::search))
        .route("/trending", get(catalog::trending))
        .route("/discover", get(catalog::discover))
        .route("/genres", get(catalog::genres))
        .route("/details", get(catalog::details))
        .route("/providers", get(catalog::providers))
        // Watchlist
        .route("/users/:user_id/watchlist", get(watchlist::list))
        .route("/users/:user_id/watchlist", post(watchlist::add))
        .route("/users/:user_id/watchlist/:content_id", get(watchlist::get_entry))
        .route("/users/:user_id/watchlist/:content_id", delete(watchlist::remove))
        // Reminders
        .route("/users/:user_id/reminders", get(reminders::list))
        .route("/users/:user_id/reminders", post(reminders::upsert))
        .route("/users/:user_id/reminders/:content_id", get(reminders::get_reminder))
        .route("/users/:user_id/reminders/:content_id", delete(reminders::remove))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

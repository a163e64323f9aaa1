use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/alerts", get(handlers::get_alerts))
        .route("/api/alerts/view", get(handlers::get_alert_view))
        .route("/api/alerts/upload", post(handlers::upload_alerts))
        .route("/api/alerts/nearest", post(handlers::nearest_alert))
        .route(
            "/api/apartments",
            get(handlers::list_apartments).post(handlers::add_apartment),
        )
        .route("/api/apartments/nearest", get(handlers::nearest_apartment))
        .route("/api/apartments/:id", delete(handlers::remove_apartment))
        .route("/api/apartments/:id/notes", post(handlers::add_note))
        .route("/api/apartments/:id/relevance", post(handlers::toggle_relevance))
        .route("/api/geocode/suggest", get(handlers::suggest_addresses))
        .with_state(state)
}

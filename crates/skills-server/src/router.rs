//! Route table

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/responses",
            get(handlers::list_responses).post(handlers::create_response),
        )
        .route(
            "/api/responses/:id",
            get(handlers::get_response)
                .put(handlers::update_response)
                .delete(handlers::delete_response),
        )
        .route(
            "/api/responses/:id/review",
            get(handlers::get_review)
                .put(handlers::put_review)
                .post(handlers::post_review),
        )
        .route(
            "/api/schema",
            get(handlers::get_schema)
                .post(handlers::create_schema)
                .put(handlers::update_schema),
        )
        .route("/api/analytics", get(handlers::analytics))
        .route("/api/taxonomy", get(handlers::taxonomy))
        .with_state(state)
}

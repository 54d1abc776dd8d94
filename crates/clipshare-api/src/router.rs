use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::messages;
use crate::pages;
use crate::state::AppState;

/// JSON API under `/api`, HTML views at the root.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().route(
        "/messages",
        get(messages::list_messages)
            .post(messages::create_message)
            .patch(messages::set_pinned)
            .delete(messages::delete_messages),
    );

    let page_routes = Router::new()
        .route("/", get(pages::composer))
        .route("/messages", get(pages::listing))
        .route("/message/{id}", get(pages::message_by_id))
        .route("/m/{slug}", get(pages::message_by_slug));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .route("/health", get(health))
        .fallback(pages::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

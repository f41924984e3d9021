//! HTTP surface: router assembly, handlers, and shared state.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::cors::CorsLayer;

use crate::infra::assets;

/// Build the full application router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/movies",
            get(handlers::list_movies).post(handlers::create_movie),
        )
        .route(
            "/movies/{id}",
            get(handlers::get_movie)
                .patch(handlers::update_movie)
                .delete(handlers::delete_movie),
        )
        .route("/web", get(assets::serve_index))
        .route("/web/{*path}", get(assets::serve_asset))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}

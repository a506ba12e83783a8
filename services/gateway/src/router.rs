use crate::handlers::{health, matches, rpc};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/matches", get(matches::list_matches))
        .route("/matches/propose", post(matches::propose_match));

    Router::new()
        .nest("/v1", api_routes)
        .route("/health", get(health::health))
        .route("/rpc", post(rpc::handle_rpc))
        .fallback(health::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

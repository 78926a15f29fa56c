pub mod routes;
pub mod state;
pub mod ws;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::adapters::http::state::HttpState;
use crate::adapters::http::ws::ws_handler;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/status", get(routes::get_status))
        .route("/api/config", get(routes::get_config))
        .route("/ws/surface", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

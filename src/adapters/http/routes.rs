use axum::{extract::State, response::IntoResponse, Json};

use crate::adapters::http::state::HttpState;
use crate::application::dto::{ConfigResponse, StatusReport, StatusResponse};

pub async fn get_status(State(st): State<HttpState>) -> impl IntoResponse {
    Json(StatusResponse {
        report: StatusReport::from_store(&st.surface.store),
        viewport: st.surface.mapper.current(),
    })
}

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    Json(ConfigResponse { config: st.config.clone(), endpoints: st.endpoints.clone() })
}

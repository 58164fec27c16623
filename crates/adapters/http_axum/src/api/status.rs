//! JSON handler for `/status`.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use silvanus_app::ports::SettingsRepository;
use silvanus_domain::status::StatusReport;

use crate::state::AppState;

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<StatusReport>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /status`
pub async fn get<R>(State(state): State<AppState<R>>) -> StatusResponse
where
    R: SettingsRepository + Send + Sync + 'static,
{
    StatusResponse::Ok(Json(state.status.snapshot().report()))
}

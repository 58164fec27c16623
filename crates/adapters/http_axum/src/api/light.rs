//! JSON handlers for the grow-light override (`/light`, `/auto-light`).

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use silvanus_app::ports::SettingsRepository;
use silvanus_domain::light_mode::LightMode;
use silvanus_domain::status::StatusReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the light endpoints.
pub enum LightResponse {
    Ok(Json<StatusReport>),
}

impl IntoResponse for LightResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Accepts `true`/`false` as a JSON boolean or as a JSON string.
fn parse_switch(body: &[u8]) -> Result<bool, ApiError> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Bool(on)) => Ok(on),
        Ok(serde_json::Value::String(word)) if word == "true" => Ok(true),
        Ok(serde_json::Value::String(word)) if word == "false" => Ok(false),
        _ => Err(ApiError::BadRequest("expected true or false".to_string())),
    }
}

/// `PUT /light`
pub async fn force<R>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<LightResponse, ApiError>
where
    R: SettingsRepository + Send + Sync + 'static,
{
    let on = parse_switch(&body)?;
    let status = state.controller.set_light_mode(LightMode::forced(on)).await?;
    Ok(LightResponse::Ok(Json(status.report())))
}

/// `POST /auto-light`
pub async fn auto<R>(State(state): State<AppState<R>>) -> Result<LightResponse, ApiError>
where
    R: SettingsRepository + Send + Sync + 'static,
{
    state.controller.set_light_mode(LightMode::Auto).await?;
    let status = state.controller.retick().await?;
    Ok(LightResponse::Ok(Json(status.report())))
}

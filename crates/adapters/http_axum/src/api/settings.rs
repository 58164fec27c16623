//! JSON handlers for `/system/settings`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use silvanus_app::ports::SettingsRepository;
use silvanus_domain::error::{ConfigError, SilvanusError};
use silvanus_domain::settings::{Settings, SettingsPatch};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the settings endpoints.
pub enum SettingsResponse {
    Ok(Json<Settings>),
}

impl IntoResponse for SettingsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /system/settings`
pub async fn get<R>(State(state): State<AppState<R>>) -> SettingsResponse
where
    R: SettingsRepository + Send + Sync + 'static,
{
    SettingsResponse::Ok(Json(state.settings_service.get()))
}

/// `PATCH /system/settings`
///
/// The body is parsed here rather than through the `Json` extractor so that
/// unknown keys and wrong types surface as a domain [`ConfigError`] (400)
/// with the same error body as a failed validation.
pub async fn patch<R>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<SettingsResponse, ApiError>
where
    R: SettingsRepository + Send + Sync + 'static,
{
    let patch: SettingsPatch = serde_json::from_slice(&body)
        .map_err(|err| SilvanusError::Config(ConfigError::Malformed(err.to_string())))?;

    let settings = state.settings_service.patch(&patch).await?;

    // settings are already persisted; a missing controller only delays them
    if let Err(err) = state.controller.retick().await {
        tracing::warn!(error = %err, "could not re-tick after settings change");
    }

    Ok(SettingsResponse::Ok(Json(settings)))
}

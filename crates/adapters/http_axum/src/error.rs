//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use silvanus_domain::error::SilvanusError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SilvanusError`] (or a request the handler could not parse) to an
/// HTTP response with the appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(SilvanusError),
    BadRequest(String),
}

impl From<SilvanusError> for ApiError {
    fn from(err: SilvanusError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Domain(SilvanusError::Config(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Domain(SilvanusError::Hardware(err)) => {
                tracing::error!(error = %err, "hardware error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            Self::Domain(SilvanusError::Sensor(err)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            Self::Domain(SilvanusError::Unavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                SilvanusError::Unavailable.to_string(),
            ),
            Self::Domain(SilvanusError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvanus_domain::error::{ConfigError, HardwareError};
    use silvanus_domain::output::Output;

    #[test]
    fn should_map_config_error_to_bad_request() {
        let response = ApiError::from(SilvanusError::Config(ConfigError::NotPositive {
            field: "lightInterval",
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_hardware_error_to_bad_gateway() {
        let response = ApiError::from(SilvanusError::Hardware(HardwareError::Unavailable {
            output: Output::Light,
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn should_map_unavailable_controller_to_service_unavailable() {
        let response = ApiError::from(SilvanusError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn should_hide_storage_details() {
        let response = ApiError::from(SilvanusError::Storage("disk full".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

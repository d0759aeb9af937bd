//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use weatherbox_domain::error::WeatherboxError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`WeatherboxError`] to an HTTP response with appropriate status code.
pub struct ApiError(WeatherboxError);

impl From<WeatherboxError> for ApiError {
    fn from(err: WeatherboxError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WeatherboxError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            WeatherboxError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            WeatherboxError::Device(err) => {
                tracing::error!(error = %err, "device error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

//! JSON handler for replacing the service configuration.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use weatherbox_app::ports::DeviceRegistry;
use weatherbox_domain::config::ServiceConfig;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    NoContent,
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `PUT /api/config`
///
/// Stops a running session, swaps in the newly resolved devices and leaves
/// the service idle.
///
/// # Errors
///
/// `400` when the configuration is incomplete, `404` when a device name does
/// not resolve. The previous configuration stays active in both cases.
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Json(config): Json<ServiceConfig>,
) -> Result<UpdateResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
{
    state
        .scheduler
        .reconfigure_from(config, state.registry.as_ref())
        .await?;
    Ok(UpdateResponse::NoContent)
}

//! JSON handlers for the start/stop control surface.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use weatherbox_app::ports::DeviceRegistry;
use weatherbox_domain::control::{ControlCommand, ControlStatus, SchedulerStatus};

use crate::state::AppState;

/// Possible responses from the command endpoint.
///
/// Misuse (starting twice, stopping an idle service) is still a `200` with a
/// `warning` body.
pub enum CommandResponse {
    Ok(Json<ControlStatus>),
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<SchedulerStatus>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/command`
pub async fn command<R>(
    State(state): State<AppState<R>>,
    Json(command): Json<ControlCommand>,
) -> CommandResponse
where
    R: DeviceRegistry + Send + Sync + 'static,
{
    let status = state.scheduler.execute(command).await;
    if let ControlStatus::Warning(reason) = &status {
        tracing::info!(?command, %reason, "control command ignored");
    }
    CommandResponse::Ok(Json(status))
}

/// `GET /api/status`
pub async fn status<R>(State(state): State<AppState<R>>) -> StatusResponse
where
    R: DeviceRegistry + Send + Sync + 'static,
{
    StatusResponse::Ok(Json(state.scheduler.status().await))
}

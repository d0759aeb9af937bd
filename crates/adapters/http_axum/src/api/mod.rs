//! JSON REST API handler modules.

pub mod config;
pub mod control;

use axum::Router;
use axum::routing::{get, post, put};

use weatherbox_app::ports::DeviceRegistry;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: DeviceRegistry + Send + Sync + 'static,
{
    Router::new()
        .route("/command", post(control::command::<R>))
        .route("/status", get(control::status::<R>))
        .route("/config", put(config::update::<R>))
}

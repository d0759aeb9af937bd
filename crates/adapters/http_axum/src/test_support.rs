//! Shared fixtures for handler tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;

use weatherbox_adapter_virtual::{VirtualDevicesConfig, VirtualRegistry};
use weatherbox_app::scheduler::WeatherScheduler;
use weatherbox_domain::catalog::AnimationCatalog;
use weatherbox_domain::config::ServiceConfig;

use crate::state::AppState;

/// State over the demo virtual devices (`weather` sensor, `led` strip).
pub fn test_state() -> AppState<VirtualRegistry> {
    let registry = VirtualRegistry::from_config(&VirtualDevicesConfig::default());
    let scheduler = WeatherScheduler::from_registry(
        ServiceConfig::new(60, "weather", "led"),
        &registry,
        Arc::new(AnimationCatalog::weather()),
    )
    .unwrap();
    AppState::new(scheduler, registry)
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

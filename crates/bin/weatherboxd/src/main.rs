//! # weatherboxd — weatherbox daemon
//!
//! Composition root that wires the devices, the scheduler and the HTTP
//! control surface together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize logging
//! - Build the virtual device registry from the `[devices]` section
//! - Construct the weather scheduler, resolving its devices by name
//! - Build the axum router over the scheduler
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (ctrl-c), tearing the scheduler down last
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use weatherbox_adapter_http_axum::router;
use weatherbox_adapter_http_axum::state::AppState;
use weatherbox_adapter_virtual::VirtualRegistry;
use weatherbox_app::scheduler::WeatherScheduler;
use weatherbox_domain::catalog::AnimationCatalog;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Devices
    let registry = VirtualRegistry::from_config(&config.devices);
    tracing::info!(
        sensors = ?registry.sensor_names(),
        led_strips = ?registry.strip_names(),
        "virtual devices registered"
    );

    // Scheduler
    let catalog = Arc::new(AnimationCatalog::weather());
    let scheduler = WeatherScheduler::from_registry(config.service.clone(), &registry, catalog)?
        .with_restart_policy(config.scheduler.restart_policy)
        .with_thresholds(config.scheduler.thresholds());
    let scheduler = Arc::new(scheduler);

    if config.scheduler.autostart {
        scheduler.start().await;
    }

    // HTTP
    let state = AppState::from_arcs(Arc::clone(&scheduler), Arc::new(registry));
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "weatherboxd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;
    tracing::info!("weatherboxd stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

// src/lib.rs
//! Per-service Prometheus instrumentation for axum/tower HTTP servers.
//!
//! [`new`] builds an isolated [`MetricsRegistry`] for one service together
//! with a [`MetricsLayer`] bound to it. Every request passing through the
//! layer updates three series, all prefixed with the snake-cased service
//! name:
//!
//! - `<name>_http_requests_total{path}` - counter
//! - `<name>_response_status{status}` - counter
//! - `<name>_http_response_time_seconds{path}` - histogram, default buckets
//!
//! The rest of the crate (`create_router`, the handlers, `AppConfig`) is a
//! small demo host that serves an instrumented "Order Service".

use anyhow::Result;
use app_state::AppState;
use axum::{routing::get, Router};

use handlers::{add_order, get_order, health_check, list_orders, metrics_handler, root_handler};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod middleware;

pub use app_state::Order;
pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_prom_metrics, // ---
    create_prom_metrics_in,
};

pub use infrastructure::metrics::prom::{
    DurationTimer, MetricsRegistry, MetricsRegistryPtr, PATH_LABEL, REQUESTS_TOTAL_SUFFIX,
    RESPONSE_STATUS_SUFFIX, RESPONSE_TIME_SUFFIX, STATUS_LABEL,
};

pub use middleware::{
    normalize_path, request_target, CapturedStatus, MetricsLayer, MetricsService, PathLabelFn,
};

/// Build an isolated registry for `service_name` and a layer that reports into it.
///
/// The layer is reusable: apply it to as many handler chains as needed.
/// Two calls with the same name never share state.
///
/// # Errors
/// Fails only if the series definitions are rejected, which a fresh
/// registry never does in practice. Treat an error as fatal at startup.
pub fn new(service_name: &str) -> domain::Result<(MetricsRegistryPtr, MetricsLayer)> {
    // ---
    let metrics = create_prom_metrics(service_name)?;
    let layer = MetricsLayer::new(metrics.clone());
    Ok((metrics, layer))
}

/// Build the demo router with configuration taken from environment variables.
pub fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    let (router, _metrics) = create_router_with(&config)?;
    Ok(router)
}

/// Build the demo router for `config`, returning the registry it reports into.
pub fn create_router_with(config: &AppConfig) -> Result<(Router, MetricsRegistryPtr)> {
    // ---
    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    let (metrics, layer) = new(&config.service_name)?;
    let layer = if config.normalize_paths {
        layer.with_path_label(normalize_path)
    } else {
        layer
    };

    let app_state = AppState::new(metrics.clone());

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/orders", get(list_orders).post(add_order))
        .route("/orders/{id}", get(get_order))
        .layer(layer)
        .with_state(app_state);

    Ok((router, metrics))
}

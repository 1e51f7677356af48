mod registry;
mod series;
mod snapshot;
mod timer;

pub use registry::{MetricsRegistry, MetricsRegistryPtr};
pub use series::{
    PATH_LABEL, REQUESTS_TOTAL_SUFFIX, RESPONSE_STATUS_SUFFIX, RESPONSE_TIME_SUFFIX, STATUS_LABEL,
};
pub use timer::DurationTimer;

use crate::domain::Result;
use std::sync::Arc;

/// Creates a new Prometheus-backed registry for `service_name`.
///
/// The registry is private to the returned handle: nothing else in the
/// process can see or mutate its series.
pub fn create(service_name: &str) -> Result<MetricsRegistryPtr> {
    tracing::info!(service = %service_name, "Initializing Prometheus metrics");
    Ok(Arc::new(MetricsRegistry::new(service_name)?))
}

/// Creates a registry for `service_name` whose series live on `registry`.
pub fn create_in(service_name: &str, registry: prometheus::Registry) -> Result<MetricsRegistryPtr> {
    tracing::info!(service = %service_name, "Initializing Prometheus metrics on shared registry");
    Ok(Arc::new(MetricsRegistry::with_registry(service_name, registry)?))
}

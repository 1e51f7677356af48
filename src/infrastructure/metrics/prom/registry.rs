//! Isolated per-service metrics registry.
//!
//! Each [`MetricsRegistry`] owns its own `prometheus::Registry` rather than
//! the process-wide default one, so several instrumented services can live
//! in one process without their series colliding. All mutation goes through
//! the increment/observe methods below; the underlying prometheus vecs are
//! atomics-backed, so concurrent requests need no external locking.

use super::series::{
    HttpSeries, PATH_LABEL, REQUESTS_TOTAL_SUFFIX, RESPONSE_STATUS_SUFFIX, RESPONSE_TIME_SUFFIX,
    STATUS_LABEL,
};
use super::snapshot::{encode_text, find_metric, validate};
use super::timer::DurationTimer;
use crate::domain::{Gatherer, Result, ServiceIdentifier};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::Registry;
use std::sync::Arc;

/// Holds the three HTTP series of one service and the registry they live on.
///
/// Cloning is cheap and yields a handle onto the same series.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    id: ServiceIdentifier,
    service_name: String,
    series: HttpSeries,
}

/// Shared handle passed to the middleware.
pub type MetricsRegistryPtr = Arc<MetricsRegistry>;

impl MetricsRegistry {
    // ---

    /// Build the three series on a fresh, private `prometheus::Registry`.
    ///
    /// Two calls with the same `service_name` produce two fully independent
    /// registries.
    pub fn new(service_name: &str) -> Result<Self> {
        // ---
        Self::with_registry(service_name, Registry::new())
    }

    /// Build the three series on a caller-supplied registry.
    ///
    /// # Errors
    /// Returns [`MetricsError::RegistrationConflict`] if a series with the
    /// same derived name is already registered on `registry`.
    ///
    /// [`MetricsError::RegistrationConflict`]: crate::domain::MetricsError::RegistrationConflict
    pub fn with_registry(service_name: &str, registry: Registry) -> Result<Self> {
        // ---
        let id = ServiceIdentifier::new(service_name);
        let series = HttpSeries::new(&id, service_name)?;
        series.register(&registry)?;

        tracing::debug!(service = %service_name, prefix = %id, "metrics registry ready");

        Ok(Self {
            registry,
            id,
            service_name: service_name.to_string(),
            series,
        })
    }

    /// The human-readable name this registry was built from.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The normalized prefix shared by all three series.
    pub fn identifier(&self) -> &ServiceIdentifier {
        &self.id
    }

    /// The underlying prometheus registry, for exporters that want it directly.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fully qualified name of the request counter.
    pub fn requests_total_name(&self) -> String {
        self.id.metric_name(REQUESTS_TOTAL_SUFFIX)
    }

    /// Fully qualified name of the status counter.
    pub fn response_status_name(&self) -> String {
        self.id.metric_name(RESPONSE_STATUS_SUFFIX)
    }

    /// Fully qualified name of the latency histogram.
    pub fn response_time_name(&self) -> String {
        self.id.metric_name(RESPONSE_TIME_SUFFIX)
    }

    /// Count one request against `path`.
    pub fn inc_request(&self, path: &str) {
        self.series.requests.with_label_values(&[path]).inc();
    }

    /// Count one response with the given decimal status label.
    pub fn inc_status(&self, status: &str) {
        self.series.statuses.with_label_values(&[status]).inc();
    }

    /// Start a latency timer for `path`. Nothing is recorded until it is observed.
    pub fn start_timer(&self, path: &str) -> DurationTimer {
        DurationTimer::start(self.series.durations.clone(), path)
    }

    /// Record one latency sample, in seconds, against `path`.
    pub fn observe_duration(&self, path: &str, secs: f64) {
        self.series.durations.with_label_values(&[path]).observe(secs);
    }

    /// Current request count for `path`; zero if the path was never seen.
    pub fn request_count(&self, path: &str) -> u64 {
        // ---
        let families = self.series.requests.collect();
        find_metric(&families, &self.requests_total_name(), PATH_LABEL, path)
            .map(|metric| metric.get_counter().get_value() as u64)
            .unwrap_or(0)
    }

    /// Current response count for `status`; zero if the status was never seen.
    pub fn status_count(&self, status: &str) -> u64 {
        // ---
        let families = self.series.statuses.collect();
        find_metric(&families, &self.response_status_name(), STATUS_LABEL, status)
            .map(|metric| metric.get_counter().get_value() as u64)
            .unwrap_or(0)
    }

    /// Number of latency samples recorded for `path`.
    pub fn duration_sample_count(&self, path: &str) -> u64 {
        // ---
        let families = self.series.durations.collect();
        find_metric(&families, &self.response_time_name(), PATH_LABEL, path)
            .map(|metric| metric.get_histogram().get_sample_count())
            .unwrap_or(0)
    }

    /// Sum, in seconds, of the latency samples recorded for `path`.
    pub fn duration_sample_sum(&self, path: &str) -> f64 {
        // ---
        let families = self.series.durations.collect();
        find_metric(&families, &self.response_time_name(), PATH_LABEL, path)
            .map(|metric| metric.get_histogram().get_sample_sum())
            .unwrap_or(0.0)
    }
}

impl Gatherer for MetricsRegistry {
    // ---
    fn gather(&self) -> Result<Vec<MetricFamily>> {
        let families = self.registry.gather();
        validate(&families)?;
        Ok(families)
    }

    fn render(&self) -> Result<String> {
        encode_text(&self.gather()?)
    }
}

/// Lets one service's series be registered into a host's registry.
impl Collector for MetricsRegistry {
    // ---
    fn desc(&self) -> Vec<&Desc> {
        self.series
            .requests
            .desc()
            .into_iter()
            .chain(self.series.statuses.desc())
            .chain(self.series.durations.desc())
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.series
            .collectors()
            .iter()
            .flat_map(|collector| collector.collect())
            .collect()
    }
}

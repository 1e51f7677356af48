//! Definitions of the three HTTP series every registry owns.

use crate::domain::{MetricsError, Result, ServiceIdentifier};
use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

/// Suffix of the per-path request counter.
pub const REQUESTS_TOTAL_SUFFIX: &str = "http_requests_total";

/// Suffix of the per-status response counter.
pub const RESPONSE_STATUS_SUFFIX: &str = "response_status";

/// Suffix of the per-path latency histogram.
pub const RESPONSE_TIME_SUFFIX: &str = "http_response_time_seconds";

/// Label carried by the request counter and the latency histogram.
pub const PATH_LABEL: &str = "path";

/// Label carried by the status counter.
pub const STATUS_LABEL: &str = "status";

/// The request counter, status counter and duration histogram of one service.
#[derive(Clone)]
pub(crate) struct HttpSeries {
    pub(crate) requests: IntCounterVec,
    pub(crate) statuses: IntCounterVec,
    pub(crate) durations: HistogramVec,
}

impl HttpSeries {
    // ---

    /// Build the series definitions. Help text mentions the human-readable name.
    pub(crate) fn new(id: &ServiceIdentifier, service_name: &str) -> Result<Self> {
        // ---
        let requests = IntCounterVec::new(
            Opts::new(
                id.metric_name(REQUESTS_TOTAL_SUFFIX),
                format!("Number of requests to service {service_name} according to path."),
            ),
            &[PATH_LABEL],
        )
        .map_err(MetricsError::InvalidDefinition)?;

        let statuses = IntCounterVec::new(
            Opts::new(
                id.metric_name(RESPONSE_STATUS_SUFFIX),
                format!("Status of HTTP response for service {service_name}"),
            ),
            &[STATUS_LABEL],
        )
        .map_err(MetricsError::InvalidDefinition)?;

        // prometheus::DEFAULT_BUCKETS; boundaries are fixed.
        let durations = HistogramVec::new(
            HistogramOpts::new(
                id.metric_name(RESPONSE_TIME_SUFFIX),
                format!("Duration of HTTP requests for service {service_name} according to path."),
            ),
            &[PATH_LABEL],
        )
        .map_err(MetricsError::InvalidDefinition)?;

        Ok(Self {
            requests,
            statuses,
            durations,
        })
    }

    /// Register all three series on `registry`.
    ///
    /// Either all three end up registered or none do: a failure part-way
    /// through unregisters whatever was already added.
    pub(crate) fn register(&self, registry: &Registry) -> Result<()> {
        // ---
        for (index, collector) in self.collectors().into_iter().enumerate() {
            let name = fq_name(&*collector);

            if let Err(err) = registry.register(collector) {
                for done in self.collectors().into_iter().take(index) {
                    if let Err(rollback) = registry.unregister(done) {
                        tracing::debug!(
                            error = %rollback,
                            "failed to unregister series during rollback"
                        );
                    }
                }
                return Err(match err {
                    prometheus::Error::AlreadyReg => MetricsError::RegistrationConflict { name },
                    other => MetricsError::InvalidDefinition(other),
                });
            }
            tracing::debug!(series = %name, "registered metric series");
        }

        Ok(())
    }

    /// Boxed handles onto the three vecs, in registration order.
    pub(crate) fn collectors(&self) -> [Box<dyn Collector>; 3] {
        [
            Box::new(self.requests.clone()),
            Box::new(self.statuses.clone()),
            Box::new(self.durations.clone()),
        ]
    }
}

/// Fully qualified name of the single descriptor a vec carries.
fn fq_name(collector: &dyn Collector) -> String {
    collector
        .desc()
        .first()
        .map(|desc| desc.fq_name.clone())
        .unwrap_or_default()
}

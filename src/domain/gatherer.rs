use super::error::Result;
use prometheus::proto::MetricFamily;
use std::sync::Arc;

/// Abstraction for anything that can hand out a point-in-time metrics snapshot.
///
/// This is the seam an exporter (scrape endpoint, push job) consumes. It is
/// read-only and safe to call while requests are being recorded.
pub trait Gatherer: Send + Sync + 'static {
    // ---
    /// Collect every registered series into an exporter-neutral snapshot.
    fn gather(&self) -> Result<Vec<MetricFamily>>;

    /// Render the current snapshot in Prometheus text exposition format.
    fn render(&self) -> Result<String>;
}

/// Type alias for any backend that implements Gatherer.
pub type GathererPtr = Arc<dyn Gatherer>;

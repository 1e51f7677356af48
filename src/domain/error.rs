use thiserror::Error;

/// Errors produced while defining or reading the instrumentation series.
///
/// None of these ever reach the HTTP response path. Construction errors are
/// meant to abort startup; gather errors are returned to whichever exporter
/// asked for the snapshot.
#[derive(Debug, Error)]
pub enum MetricsError {
    // ---
    /// A series with the same fully qualified name already lives on the registry.
    #[error("metric series `{name}` is already registered")]
    RegistrationConflict { name: String },

    /// Prometheus rejected a series definition (bad name or label schema).
    #[error("invalid metric definition: {0}")]
    InvalidDefinition(#[source] prometheus::Error),

    /// The gathered snapshot is internally inconsistent.
    #[error("failed to gather metrics: {0}")]
    GatherFailure(String),

    /// Text exposition encoding failed.
    #[error("failed to encode metrics: {0}")]
    Encode(#[source] prometheus::Error),
}

/// Result alias for metrics operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

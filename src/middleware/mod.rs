//! Request instrumentation middleware.
//!
//! [`MetricsLayer`] decorates any `tower::Service` that handles
//! `http::Request`s. Each request starts a latency timer labelled with its
//! path, is delegated unchanged to the inner service, and once the inner
//! future resolves to a response the status counter, the request counter
//! and the latency histogram are updated in that order.

mod layer;
mod path;
mod status;

pub use layer::{MetricsLayer, MetricsService, PathLabelFn};
pub use path::{normalize_path, request_target};
pub use status::CapturedStatus;

// Demo host handlers - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod metrics;
mod orders;
mod root;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Order handlers
pub use orders::{add_order, get_order, list_orders};

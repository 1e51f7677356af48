mod error;
mod gatherer;
mod naming;

// Publicly expose the error taxonomy
pub use error::{MetricsError, Result};

// Publicly expose the gatherer abstraction
pub use gatherer::{Gatherer, GathererPtr};

// Publicly expose name normalization
pub use naming::{to_snake_case, ServiceIdentifier};

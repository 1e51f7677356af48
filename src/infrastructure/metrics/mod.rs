pub mod prom;

// Re-export the factory functions for easy access
pub use prom::create as create_prom_metrics;
pub use prom::create_in as create_prom_metrics_in;

// src/config.rs

//! Demo host configuration loaded from environment variables.
//!
//! The instrumentation itself takes nothing but a service name. This module
//! only configures the bundled demo server that hosts it. Configuration is
//! read once at startup; unparsable values fall back to their defaults.

use anyhow::Result;
use std::net::SocketAddr;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable, falling back to a default string.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Service name used when `PROM_DEMO_SERVICE_NAME` is unset.
pub const DEFAULT_SERVICE_NAME: &str = "Order Service";

/// Bind address used when `PROM_DEMO_BIND_ADDR` is unset or invalid.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

// ============================================================
// Public configuration facade
// ============================================================

/// Demo host configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Human-readable service name the metric prefix is derived from.
    pub service_name: String,

    /// Address the demo server listens on.
    pub bind_addr: SocketAddr,

    /// Label requests with [`crate::normalize_path`] instead of the raw target.
    pub normalize_paths: bool,
}

impl AppConfig {
    /// Loads the demo configuration from the environment.
    ///
    /// # Errors
    /// Returns an error only if the built-in default bind address is invalid.
    pub fn from_env() -> Result<Self> {
        // ---
        let default_addr: SocketAddr = DEFAULT_BIND_ADDR.parse()?;

        Ok(Self {
            service_name: optional_env!("PROM_DEMO_SERVICE_NAME", DEFAULT_SERVICE_NAME),
            bind_addr: optional_env_parse!("PROM_DEMO_BIND_ADDR", SocketAddr, default_addr),
            normalize_paths: optional_env_parse!("PROM_DEMO_NORMALIZE_PATHS", bool, false),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            normalize_paths: false,
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("PROM_DEMO_SERVICE_NAME");
        std::env::remove_var("PROM_DEMO_BIND_ADDR");
        std::env::remove_var("PROM_DEMO_NORMALIZE_PATHS");
    }

    #[test]
    #[serial]
    fn defaults_applied() -> Result<()> {
        // ---
        clear_env();

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!cfg.normalize_paths);

        let default = AppConfig::default();
        assert_eq!(default.service_name, cfg.service_name);
        assert_eq!(default.bind_addr, cfg.bind_addr);

        Ok(())
    }

    #[test]
    #[serial]
    fn overrides_defaults() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("PROM_DEMO_SERVICE_NAME", "Billing API");
        std::env::set_var("PROM_DEMO_BIND_ADDR", "0.0.0.0:9000");
        std::env::set_var("PROM_DEMO_NORMALIZE_PATHS", "true");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.service_name, "Billing API");
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.normalize_paths);

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn unparsable_values_fall_back() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("PROM_DEMO_BIND_ADDR", "not-an-address");
        std::env::set_var("PROM_DEMO_NORMALIZE_PATHS", "maybe");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!cfg.normalize_paths);

        clear_env();
        Ok(())
    }
}

// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::Router;
use axum_prom_middleware::{create_router_with, AppConfig, MetricsRegistryPtr};
use reqwest::Client;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

// ============================================================================
// Test Setup
// ============================================================================

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---

    /// Serve the demo router built for `service_name`.
    pub async fn demo(service_name: &str) -> (Self, MetricsRegistryPtr) {
        // ---
        let config = AppConfig {
            service_name: service_name.to_string(),
            ..AppConfig::default()
        };
        let (app, metrics) = create_router_with(&config).expect("Should be able to create router");

        (Self::serve(app).await, metrics)
    }

    /// Serve an arbitrary router on an ephemeral port.
    pub async fn serve(app: Router) -> Self {
        // --
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}

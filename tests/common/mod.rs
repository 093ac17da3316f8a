//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log_harness::config::HarnessConfig;
use log_harness::harness::{RequestCounter, SeededRandom};
use log_harness::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A harness server running on an ephemeral local port.
#[allow(dead_code)]
pub struct TestHarness {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub counter: Arc<RequestCounter>,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestHarness {
    /// URL of an endpoint under the default `/api` prefix.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/api{}", self.addr, path)
    }
}

/// Config with a short simulated delay so tests stay quick.
#[allow(dead_code)]
pub fn fast_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.simulation.min_delay_ms = 10;
    config.simulation.delay_spread_ms = 20;
    config
}

/// Start the harness with a seeded random source.
pub async fn start_harness(config: HarnessConfig) -> TestHarness {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_random_source(
        config,
        shutdown.clone(),
        Arc::new(SeededRandom::new(2024)),
    );
    let counter = server.counter();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestHarness {
        addr,
        shutdown,
        counter,
        client,
    }
}

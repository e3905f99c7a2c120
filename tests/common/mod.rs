//! Shared utilities for integration tests.

use sdk_rust::{GatewayClient, SendTxRequest};
use send_tx_gateway::{GatewayConfig, HttpServer, Shutdown};
use std::sync::Arc;
use std::time::Duration;

pub const TO: &str = "0x2222222222222222222222222222222222222222";

/// A gateway listening on an ephemeral local port.
pub struct RunningGateway {
    pub base_url: String,
    pub coordinator: Arc<send_tx_gateway::SubmissionCoordinator>,
    shutdown: Shutdown,
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the real server with `config` on 127.0.0.1.
pub async fn start_gateway(mut config: GatewayConfig) -> RunningGateway {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config);
    let coordinator = server.coordinator().clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningGateway {
        base_url: format!("http://{}", addr),
        coordinator,
        shutdown,
    }
}

impl RunningGateway {
    /// Client that bypasses proxies and never reuses connections.
    pub fn client(&self) -> GatewayClient {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();
        GatewayClient::with_client(&self.base_url, http)
    }
}

/// A valid request for `chain` using idempotency key `key`.
#[allow(dead_code)]
pub fn transfer(chain: &str, value: u64, key: &str) -> SendTxRequest {
    SendTxRequest {
        chain: chain.to_string(),
        to: TO.to_string(),
        from: None,
        value: value.into(),
        data: None,
        idempotency_key: Some(key.to_string()),
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::blockchain::Chain;

/// Root configuration for the transaction gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Idempotency key rules.
    pub idempotency: IdempotencyConfig,

    /// Stub submitter behaviour.
    pub submitter: SubmitterConfig,

    /// Per-chain validation rules, keyed by chain literal.
    /// Chains left out of a config file are not accepted.
    pub chains: ChainsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            idempotency: IdempotencyConfig::default(),
            submitter: SubmitterConfig::default(),
            chains: default_chains(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 64 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Idempotency key configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdempotencyConfig {
    /// Longest accepted key, in characters.
    pub max_key_length: usize,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self { max_key_length: 128 }
    }
}

/// Submitter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Deadline for a single submit call in milliseconds.
    pub submit_timeout_ms: u64,

    /// Artificial latency added to every stub submission.
    pub simulated_latency_ms: u64,

    /// Probability (0.0..=1.0) that a stub submission fails.
    pub failure_rate: f64,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            submit_timeout_ms: 10_000,
            simulated_latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

/// Map of chain → rules.
pub type ChainsConfig = BTreeMap<Chain, ChainConfig>;

/// Rules for a single chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChainConfig {
    /// EIP-155 chain id, mixed into synthetic transaction hashes.
    pub chain_id: u64,

    /// Accepted recipient address shape.
    #[serde(default)]
    pub address: AddressFormat,
}

impl ChainConfig {
    /// Defaults for a known chain (public chain id, EVM address shape).
    pub fn for_chain(chain: Chain) -> Self {
        Self {
            chain_id: chain.default_chain_id(),
            address: AddressFormat::default(),
        }
    }
}

/// Address grammar: a literal prefix followed by exactly `hex_digits` hex characters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AddressFormat {
    pub prefix: String,
    pub hex_digits: usize,
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self {
            prefix: "0x".to_string(),
            hex_digits: 40,
        }
    }
}

impl AddressFormat {
    /// Check whether `address` has this shape.
    pub fn matches(&self, address: &str) -> bool {
        match address.strip_prefix(self.prefix.as_str()) {
            Some(digits) => {
                digits.len() == self.hex_digits
                    && digits.bytes().all(|b| b.is_ascii_hexdigit())
            }
            None => false,
        }
    }
}

/// Default rule set for every known chain.
pub fn default_chains() -> ChainsConfig {
    Chain::ALL
        .into_iter()
        .map(|chain| (chain, ChainConfig::for_chain(chain)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_format_matches() {
        let format = AddressFormat::default();
        assert!(format.matches("0x2222222222222222222222222222222222222222"));
        assert!(format.matches("0xAbCdEf0123456789aBcDeF0123456789AbCdEf01"));
        // Missing prefix
        assert!(!format.matches("2222222222222222222222222222222222222222"));
        // Too short
        assert!(!format.matches("0x2222"));
        // Not hex
        assert!(!format.matches("0xzz22222222222222222222222222222222222222"));
        assert!(!format.matches(""));
    }

    #[test]
    fn test_custom_address_format() {
        let format = AddressFormat {
            prefix: "acct:".to_string(),
            hex_digits: 4,
        };
        assert!(format.matches("acct:beef"));
        assert!(!format.matches("0xbeef"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [chains.polygon]
            chain_id = 80002
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.listener.max_body_size, 64 * 1024);
        assert_eq!(config.idempotency.max_key_length, 128);
        assert_eq!(config.chains.len(), 1);
        let polygon = &config.chains[&Chain::Polygon];
        assert_eq!(polygon.chain_id, 80002);
        assert_eq!(polygon.address, AddressFormat::default());
    }

    #[test]
    fn test_default_chains_cover_every_chain() {
        let chains = default_chains();
        for chain in Chain::ALL {
            assert_eq!(chains[&chain].chain_id, chain.default_chain_id());
        }
    }
}

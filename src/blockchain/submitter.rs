//! Transaction submission capability.
//!
//! `ChainSubmitter` is the seam a real RPC client would plug into. The only
//! shipped implementation is `StubSubmitter`, which never touches a network.

use alloy::primitives::{keccak256, B256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::blockchain::types::{
    SubmissionError, SubmissionOutcome, SubmissionResult, SubmissionStatus, Transfer,
};
use crate::config::{ChainsConfig, SubmitterConfig};

/// Something that can submit a validated transfer to its chain.
#[async_trait]
pub trait ChainSubmitter: Send + Sync {
    /// Submit `transfer` and return the node's answer.
    async fn submit(&self, transfer: &Transfer) -> SubmissionOutcome<SubmissionResult>;
}

/// Simulated submitter.
///
/// Every call gets a fresh sequence number, so two calls with identical
/// inputs still produce distinct transaction ids and hashes.
#[derive(Debug)]
pub struct StubSubmitter {
    chains: ChainsConfig,
    latency: Duration,
    failure_rate: f64,
    sequence: AtomicU64,
}

impl StubSubmitter {
    /// Create a stub that succeeds immediately.
    pub fn new(chains: ChainsConfig) -> Self {
        Self {
            chains,
            latency: Duration::ZERO,
            failure_rate: 0.0,
            sequence: AtomicU64::new(0),
        }
    }

    /// Create a stub from the submitter section of the config.
    pub fn from_config(chains: ChainsConfig, config: &SubmitterConfig) -> Self {
        Self::new(chains)
            .with_latency(Duration::from_millis(config.simulated_latency_ms))
            .with_failure_rate(config.failure_rate)
    }

    /// Delay every submission by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail a random fraction of submissions.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    /// Number of submit calls made so far, including failed ones.
    pub fn calls(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn synthesize_hash(&self, transfer: &Transfer, sequence: u64) -> B256 {
        let chain_id = self
            .chains
            .get(&transfer.chain)
            .map(|c| c.chain_id)
            .unwrap_or_else(|| transfer.chain.default_chain_id());

        let from = transfer.from.as_deref().unwrap_or_default();
        let mut data = Vec::with_capacity(
            8 + transfer.to.len() + from.len() + 32 + transfer.data.len() + 8,
        );
        data.extend_from_slice(&chain_id.to_be_bytes());
        data.extend_from_slice(transfer.to.to_ascii_lowercase().as_bytes());
        data.extend_from_slice(from.to_ascii_lowercase().as_bytes());
        data.extend_from_slice(&transfer.value.to_be_bytes::<32>());
        data.extend_from_slice(&transfer.data);
        data.extend_from_slice(&sequence.to_be_bytes());
        keccak256(&data)
    }
}

#[async_trait]
impl ChainSubmitter for StubSubmitter {
    async fn submit(&self, transfer: &Transfer) -> SubmissionOutcome<SubmissionResult> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.failure_rate > 0.0 && fastrand::f64() < self.failure_rate {
            tracing::debug!(chain = %transfer.chain, sequence, "Simulated node failure");
            return Err(SubmissionError::Rpc("simulated node failure".to_string()));
        }

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Ok(SubmissionResult {
            transaction_id: Uuid::new_v4(),
            tx_hash: self.synthesize_hash(transfer, sequence),
            chain: transfer.chain,
            status: SubmissionStatus::Submitted,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Chain;
    use crate::config::schema::default_chains;
    use alloy::primitives::{Bytes, U256};

    fn transfer() -> Transfer {
        Transfer {
            chain: Chain::Ethereum,
            to: "0x2222222222222222222222222222222222222222".into(),
            from: None,
            value: U256::from(10u64),
            data: Bytes::new(),
            idempotency_key: "k1".into(),
        }
    }

    #[tokio::test]
    async fn test_submit_is_unique_per_call() {
        let submitter = StubSubmitter::new(default_chains());
        let first = submitter.submit(&transfer()).await.unwrap();
        let second = submitter.submit(&transfer()).await.unwrap();

        assert_eq!(submitter.calls(), 2);
        assert_ne!(first.transaction_id, second.transaction_id);
        assert_ne!(first.tx_hash, second.tx_hash);
        assert_eq!(first.status, SubmissionStatus::Submitted);
        assert_eq!(first.chain, Chain::Ethereum);
        assert!(first.created_at > 0);
    }

    #[test]
    fn test_hash_is_deterministic_for_sequence() {
        let submitter = StubSubmitter::new(default_chains());
        let t = transfer();
        assert_eq!(submitter.synthesize_hash(&t, 7), submitter.synthesize_hash(&t, 7));
        assert_ne!(submitter.synthesize_hash(&t, 7), submitter.synthesize_hash(&t, 8));

        let mut on_polygon = t.clone();
        on_polygon.chain = Chain::Polygon;
        assert_ne!(
            submitter.synthesize_hash(&t, 7),
            submitter.synthesize_hash(&on_polygon, 7)
        );

        let mut with_sender = t.clone();
        with_sender.from = Some("0x1111111111111111111111111111111111111111".into());
        assert_ne!(
            submitter.synthesize_hash(&t, 7),
            submitter.synthesize_hash(&with_sender, 7)
        );
    }

    #[tokio::test]
    async fn test_failure_rate_one_always_fails() {
        let submitter = StubSubmitter::new(default_chains()).with_failure_rate(1.0);
        let err = submitter.submit(&transfer()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Rpc(_)));
        assert_eq!(submitter.calls(), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = SubmitterConfig {
            simulated_latency_ms: 20,
            ..SubmitterConfig::default()
        };
        let submitter = StubSubmitter::from_config(default_chains(), &config);
        let start = std::time::Instant::now();
        submitter.submit(&transfer()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}

//! Chain-specific types and error definitions.

use alloy::primitives::{Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Target networks the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Sepolia,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Ethereum, Chain::Polygon, Chain::Sepolia];

    /// Wire literal for this chain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Sepolia => "sepolia",
        }
    }

    /// EIP-155 chain id of the public network.
    pub fn default_chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Polygon => 137,
            Chain::Sepolia => 11_155_111,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a chain literal is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chain '{0}'")]
pub struct UnknownChain(pub String);

impl FromStr for Chain {
    type Err = UnknownChain;

    /// Case-sensitive: only the exact lowercase literals are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.as_str() == s)
            .ok_or_else(|| UnknownChain(s.to_string()))
    }
}

/// A validated transfer, ready to be handed to a submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub chain: Chain,
    pub to: String,
    /// Sender address, when the client named one.
    pub from: Option<String>,
    pub value: U256,
    pub data: Bytes,
    pub idempotency_key: String,
}

/// Status of a submission as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Accepted into the node's mempool.
    Submitted,
    /// The node answered but rejected the transaction.
    Failed,
}

/// Outcome of a successful submit call. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub transaction_id: Uuid,
    pub tx_hash: B256,
    pub chain: Chain,
    pub status: SubmissionStatus,
    /// Unix timestamp (seconds).
    pub created_at: u64,
}

/// Errors that can occur while submitting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// RPC request failed or the node refused the transaction.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Submission did not finish in time.
    #[error("Submission timed out after {0} ms")]
    Timeout(u64),

    /// The submission task died before producing a result.
    #[error("Submission aborted: {0}")]
    Aborted(String),
}

/// Result type for submission operations.
pub type SubmissionOutcome<T> = Result<T, SubmissionError>;

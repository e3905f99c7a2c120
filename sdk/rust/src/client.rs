use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body of `POST /send-tx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTxRequest {
    pub chain: String,
    pub to: String,
    /// Optional sender address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Wei amount; a JSON number or a base-10 string.
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// Successful submission as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_id: String,
    pub tx_hash: String,
    pub chain: String,
    pub status: String,
    pub created_at: u64,
}

/// Receipt plus whether the gateway replayed an earlier result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTxReply {
    pub receipt: TxReceipt,
    pub replayed: bool,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with an error status.
    #[error("gateway returned {status}: {body}")]
    Rejected { status: StatusCode, body: Value },
}

impl ClientError {
    /// Error kind reported by the gateway (`InvalidChain`, `SubmissionFailed`, ...).
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { body, .. } => body.get("error").and_then(Value::as_str),
            ClientError::Transport(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
        }
    }
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured reqwest client (proxies, pooling, timeouts).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a transaction. Safe to retry with the same idempotency key.
    pub async fn send_tx(&self, req: &SendTxRequest) -> Result<SendTxReply, ClientError> {
        let resp = self
            .client
            .post(format!("{}/send-tx", self.base_url))
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ClientError::Rejected { status, body });
        }

        let replayed = status == StatusCode::OK;
        let receipt = resp.json::<TxReceipt>().await?;
        Ok(SendTxReply { receipt, replayed })
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

//! Async client for the send-tx gateway.

pub mod client;

pub use client::{ClientError, GatewayClient, SendTxReply, SendTxRequest, TxReceipt};

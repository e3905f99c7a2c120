//! Idempotent blockchain transaction submission gateway.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod idempotency;
pub mod lifecycle;
pub mod observability;
pub mod submission;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use idempotency::IdempotencyStore;
pub use lifecycle::Shutdown;
pub use submission::SubmissionCoordinator;

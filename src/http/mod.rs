//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request id, trace, timeout, body limit)
//!     → handlers.rs (decode body, pick up Idempotency-Key header)
//!     → SubmissionCoordinator
//!     → response.rs (errors → status code + JSON body)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::{IDEMPOTENCY_KEY, IDEMPOTENT_REPLAYED};
pub use server::{AppState, HttpServer};

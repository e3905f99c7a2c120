//! Submission pipeline.
//!
//! # Data Flow
//! ```text
//! SubmissionRequest
//!     → validator.rs (reject early, no side effects)
//!     → coordinator.rs
//!         → IdempotencyStore::claim_or_get(key)
//!             Hit      → replay stored result
//!             Claimed  → ChainSubmitter::submit → complete / abandon
//!     → Handled { result, replayed } | HandleError
//! ```

pub mod coordinator;
pub mod error;
pub mod types;
pub mod validator;

pub use coordinator::SubmissionCoordinator;
pub use error::{HandleError, ValidationError, ValidationErrorKind};
pub use types::{Handled, SubmissionRequest};
pub use validator::Validator;

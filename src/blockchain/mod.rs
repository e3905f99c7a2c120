//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Transfer (validated request)
//!     → submitter.rs (ChainSubmitter: stubbed, no network)
//!     → SubmissionResult (transaction id, hash, status)
//! ```
//!
//! # Constraints
//! - No signing, fee estimation or confirmation tracking
//! - Submit is fallible by contract even though the stub rarely fails

pub mod submitter;
pub mod types;

pub use submitter::{ChainSubmitter, StubSubmitter};
pub use types::{
    Chain, SubmissionError, SubmissionOutcome, SubmissionResult, SubmissionStatus, Transfer,
    UnknownChain,
};

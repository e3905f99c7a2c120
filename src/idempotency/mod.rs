//! Idempotency subsystem.
//!
//! # Data Flow
//! ```text
//! claim_or_get(key)
//!     → unknown key:   insert InFlight, hand out ClaimGuard
//!     → InFlight key:  wait on the key's watch channel
//!     → Completed key: return the stored SubmissionResult
//!
//! ClaimGuard::complete(result) → slot becomes Completed, waiters woken
//! ClaimGuard::abandon() / drop → slot removed, waiters retry the claim
//! ```
//!
//! Entries live for the lifetime of the process; there is no eviction.

pub mod store;

pub use store::{Claim, ClaimGuard, EntryState, IdempotencyStore};

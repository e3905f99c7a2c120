//! Key → outcome map with per-key coordination.
//!
//! Each key moves through `InFlight → Completed` at most once. The shard lock
//! of the underlying map is held only while inspecting or inserting a slot,
//! never while a submission runs, so distinct keys never wait on each other.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::blockchain::SubmissionResult;
use crate::observability::metrics;

/// Answer from [`IdempotencyStore::claim_or_get`].
#[derive(Debug)]
pub enum Claim {
    /// A result already exists for the key.
    Hit(SubmissionResult),
    /// The caller holds the exclusive right to submit for the key.
    Claimed(ClaimGuard),
}

/// Observable state of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    InFlight,
    Completed(SubmissionResult),
}

enum Slot {
    /// Waiters clone this receiver and wait for the claim holder to publish.
    InFlight(watch::Receiver<Option<SubmissionResult>>),
    Completed(SubmissionResult),
}

/// Thread-safe idempotency store. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct IdempotencyStore {
    entries: Arc<DashMap<String, Slot>>,
}

impl IdempotencyStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored result for `key`, waiting for an in-flight claim
    /// to finish if necessary, or claim the key if it is unknown.
    ///
    /// If the claim holder abandons, waiters race to claim the key again.
    /// Dropping the returned future stops waiting without affecting the
    /// claim holder or other waiters.
    pub async fn claim_or_get(&self, key: &str) -> Claim {
        loop {
            let mut pending = match self.entries.entry(key.to_owned()) {
                Entry::Occupied(slot) => match slot.get() {
                    Slot::Completed(result) => return Claim::Hit(result.clone()),
                    Slot::InFlight(rx) => rx.clone(),
                },
                Entry::Vacant(vacant) => {
                    let (tx, rx) = watch::channel(None);
                    vacant.insert(Slot::InFlight(rx));
                    metrics::record_store_size(self.len());
                    tracing::debug!(key = %key, "Idempotency key claimed");
                    return Claim::Claimed(ClaimGuard {
                        store: self.clone(),
                        key: key.to_owned(),
                        publisher: Some(tx),
                    });
                }
            };

            tracing::debug!(key = %key, "Waiting for in-flight submission");
            let published = pending
                .wait_for(Option::is_some)
                .await
                .ok()
                .and_then(|value| value.clone());

            match published {
                Some(result) => return Claim::Hit(result),
                // Publisher dropped without a result: the claim was abandoned.
                None => continue,
            }
        }
    }

    /// Current state of `key`, if it has been seen.
    pub fn state(&self, key: &str) -> Option<EntryState> {
        self.entries.get(key).map(|slot| match slot.value() {
            Slot::InFlight(_) => EntryState::InFlight,
            Slot::Completed(result) => EntryState::Completed(result.clone()),
        })
    }

    /// Number of tracked keys, in flight or completed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_in_flight(&self, key: &str) {
        self.entries
            .remove_if(key, |_, slot| matches!(slot, Slot::InFlight(_)));
    }
}

impl std::fmt::Debug for IdempotencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotencyStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Exclusive right to perform the submission for one key.
///
/// Consumed by [`complete`](Self::complete) or [`abandon`](Self::abandon).
/// Dropping it unfinished abandons the claim.
#[derive(Debug)]
#[must_use = "an unfinished claim is abandoned when dropped"]
pub struct ClaimGuard {
    store: IdempotencyStore,
    key: String,
    publisher: Option<watch::Sender<Option<SubmissionResult>>>,
}

impl ClaimGuard {
    /// The claimed key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store `result` for the key and wake every waiter with it.
    pub fn complete(mut self, result: SubmissionResult) {
        if let Some(publisher) = self.publisher.take() {
            // Slot first, so callers arriving now see Completed instead of
            // subscribing to a channel that is about to close.
            self.store
                .entries
                .insert(self.key.clone(), Slot::Completed(result.clone()));
            publisher.send_replace(Some(result));
            metrics::record_store_size(self.store.len());
            tracing::debug!(key = %self.key, "Idempotency key completed");
        }
    }

    /// Release the claim without a result so the key can be retried.
    pub fn abandon(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(publisher) = self.publisher.take() {
            self.store.remove_in_flight(&self.key);
            drop(publisher);
            metrics::record_store_size(self.store.len());
            tracing::debug!(key = %self.key, "Idempotency claim abandoned");
        }
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.release();
    }
}

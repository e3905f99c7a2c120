//! Submission orchestration: validate → claim or replay → submit → publish.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::blockchain::{ChainSubmitter, SubmissionError, SubmissionResult, Transfer};
use crate::config::GatewayConfig;
use crate::idempotency::{Claim, ClaimGuard, IdempotencyStore};
use crate::observability::metrics;
use crate::submission::error::HandleError;
use crate::submission::types::{Handled, SubmissionRequest};
use crate::submission::validator::Validator;

/// Decides, per request, whether to replay, wait, or submit.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    validator: Validator,
    store: IdempotencyStore,
    submitter: Arc<dyn ChainSubmitter>,
    submit_timeout: Duration,
}

impl SubmissionCoordinator {
    /// Create a coordinator with a fresh store.
    pub fn new(
        validator: Validator,
        submitter: Arc<dyn ChainSubmitter>,
        submit_timeout: Duration,
    ) -> Self {
        Self::with_store(validator, IdempotencyStore::new(), submitter, submit_timeout)
    }

    /// Create a coordinator around an existing store.
    pub fn with_store(
        validator: Validator,
        store: IdempotencyStore,
        submitter: Arc<dyn ChainSubmitter>,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            validator,
            store,
            submitter,
            submit_timeout,
        }
    }

    /// Build the coordinator described by `config`.
    pub fn from_config(config: &GatewayConfig, submitter: Arc<dyn ChainSubmitter>) -> Self {
        Self::new(
            Validator::from_config(config),
            submitter,
            Duration::from_millis(config.submitter.submit_timeout_ms),
        )
    }

    /// The store backing this coordinator.
    pub fn store(&self) -> &IdempotencyStore {
        &self.store
    }

    /// Handle one request.
    ///
    /// At most one submit call is made per idempotency key; every caller
    /// sharing the key gets the same result. Failed submissions are not
    /// remembered, so a retry with the same key submits again.
    pub async fn handle(&self, request: &SubmissionRequest) -> Result<Handled, HandleError> {
        let transfer = match self.validator.validate(request) {
            Ok(transfer) => transfer,
            Err(e) => {
                tracing::info!(kind = %e.kind, field = e.field, "Rejected submission request");
                metrics::record_validation_failure(e.kind.as_str());
                metrics::record_request("invalid");
                return Err(e.into());
            }
        };

        match self.store.claim_or_get(&transfer.idempotency_key).await {
            Claim::Hit(result) => {
                tracing::info!(
                    key = %transfer.idempotency_key,
                    transaction_id = %result.transaction_id,
                    "Replaying stored submission"
                );
                metrics::record_request("replayed");
                Ok(Handled::replayed(result))
            }
            Claim::Claimed(guard) => {
                let outcome = self.submit_claimed(guard, transfer).await;
                metrics::record_request(if outcome.is_ok() { "submitted" } else { "failed" });
                Ok(Handled::submitted(outcome?))
            }
        }
    }

    /// Run the submission on its own task so that it finishes, and its
    /// result is stored, even if the claiming request is dropped.
    async fn submit_claimed(
        &self,
        guard: ClaimGuard,
        transfer: Transfer,
    ) -> Result<SubmissionResult, SubmissionError> {
        let submitter = Arc::clone(&self.submitter);
        let submit_timeout = self.submit_timeout;

        let task = tokio::spawn(async move {
            let start = Instant::now();
            let chain = transfer.chain;
            let outcome = match tokio::time::timeout(submit_timeout, submitter.submit(&transfer)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SubmissionError::Timeout(submit_timeout.as_millis() as u64)),
            };
            metrics::record_submission(chain.as_str(), outcome.is_ok(), start);

            match outcome {
                Ok(result) => {
                    tracing::info!(
                        key = %transfer.idempotency_key,
                        chain = %chain,
                        transaction_id = %result.transaction_id,
                        tx_hash = %result.tx_hash,
                        "Transaction submitted"
                    );
                    guard.complete(result.clone());
                    Ok(result)
                }
                Err(e) => {
                    tracing::warn!(
                        key = %transfer.idempotency_key,
                        chain = %chain,
                        error = %e,
                        "Submission failed, releasing idempotency key"
                    );
                    guard.abandon();
                    Err(e)
                }
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The guard was dropped with the task, so the key is free again.
                tracing::error!(error = %e, "Submission task aborted");
                Err(SubmissionError::Aborted(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionCoordinator")
            .field("validator", &self.validator)
            .field("store", &self.store)
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::http::response::malformed_request;
use crate::http::server::AppState;
use crate::submission::SubmissionRequest;

/// Header a client may use instead of the `idempotency_key` body field.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

/// Set on every successful response; `true` when the result was replayed.
pub const IDEMPOTENT_REPLAYED: &str = "idempotent-replayed";

/// `POST /send-tx`
///
/// 201 for a fresh submission, 200 when an earlier result is replayed.
pub async fn send_tx(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Response {
    let Json(mut request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable request body");
            return malformed_request(rejection);
        }
    };

    // The body wins when both are present.
    if request.idempotency_key.is_none() {
        request.idempotency_key = headers
            .get(IDEMPOTENCY_KEY)
            .and_then(|v| v.to_str().ok())
            .map(|key| Value::String(key.to_owned()));
    }

    match state.coordinator.handle(&request).await {
        Ok(handled) => {
            let (status, replayed) = if handled.replayed {
                (StatusCode::OK, "true")
            } else {
                (StatusCode::CREATED, "false")
            };
            (status, [(IDEMPOTENT_REPLAYED, replayed)], Json(handled.result)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "idempotency_entries": state.coordinator.store().len(),
    }))
}

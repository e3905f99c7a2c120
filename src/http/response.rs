//! Mapping of pipeline errors to HTTP responses.
//!
//! | Error                       | Status |
//! |-----------------------------|--------|
//! | validation failure          | 422    |
//! | malformed JSON              | from the extractor (400/413/415/422) |
//! | RPC failure / submit timeout| 502    |
//! | aborted submission          | 500    |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::blockchain::SubmissionError;
use crate::submission::HandleError;

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub detail: String,
}

impl HandleError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            HandleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HandleError::Submission(SubmissionError::Rpc(_))
            | HandleError::Submission(SubmissionError::Timeout(_)) => StatusCode::BAD_GATEWAY,
            HandleError::Submission(SubmissionError::Aborted(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            HandleError::Validation(e) => ErrorBody {
                error: e.kind.as_str(),
                field: Some(e.field),
                detail: e.detail.clone(),
            },
            HandleError::Submission(e) => ErrorBody {
                error: match e {
                    SubmissionError::Rpc(_) => "SubmissionFailed",
                    SubmissionError::Timeout(_) => "SubmissionTimeout",
                    SubmissionError::Aborted(_) => "SubmissionAborted",
                },
                field: None,
                detail: e.to_string(),
            },
        }
    }
}

impl IntoResponse for HandleError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Response for a body the JSON extractor could not read.
pub fn malformed_request(rejection: JsonRejection) -> Response {
    let body = ErrorBody {
        error: "MalformedRequest",
        field: None,
        detail: rejection.body_text(),
    };
    (rejection.status(), Json(body)).into_response()
}

//! Request and response types for the submission pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::blockchain::SubmissionResult;

/// A submission request as received from a client.
///
/// Every field is optional on the wire so that missing or mistyped input is
/// reported by the validator with a precise error kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionRequest {
    #[serde(deserialize_with = "text")]
    pub chain: String,
    #[serde(deserialize_with = "text")]
    pub to: String,
    /// Optional sender address, checked with the same rule as `to`.
    #[serde(
        alias = "from_address",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<String>,
    /// JSON integer, or a base-10 string for amounts beyond `u64`.
    pub value: Value,
    /// Optional `0x`-prefixed calldata.
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Kept as raw JSON so that a non-string key is rejected by the validator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<Value>,
}

/// Non-string JSON is kept as its literal text (`null` becomes empty) so the
/// field fails its own format check instead of the whole body.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

impl SubmissionRequest {
    /// Build a plain transfer request.
    pub fn new(
        chain: impl Into<String>,
        to: impl Into<String>,
        value: impl Into<Value>,
        idempotency_key: impl Into<String>,
    ) -> Self {
        Self {
            chain: chain.into(),
            to: to.into(),
            from: None,
            value: value.into(),
            data: None,
            idempotency_key: Some(Value::String(idempotency_key.into())),
        }
    }

    /// Set the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Attach calldata.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// What the coordinator did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub result: SubmissionResult,
    /// True when the result came from an earlier or concurrent submission
    /// rather than from a submit call made for this request.
    pub replayed: bool,
}

impl Handled {
    pub fn submitted(result: SubmissionResult) -> Self {
        Self {
            result,
            replayed: false,
        }
    }

    pub fn replayed(result: SubmissionResult) -> Self {
        Self {
            result,
            replayed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_deserialization() {
        let request: SubmissionRequest = serde_json::from_str(r#"{"chain": "polygon"}"#).unwrap();
        assert_eq!(request.chain, "polygon");
        assert!(request.to.is_empty());
        assert!(request.value.is_null());
        assert!(request.idempotency_key.is_none());
    }

    #[test]
    fn test_builder() {
        let request = SubmissionRequest::new("ethereum", "0xabc", 10u64, "k1").with_data("0x00");
        assert_eq!(request.value, Value::from(10u64));
        assert_eq!(request.data.as_deref(), Some("0x00"));
        assert_eq!(request.idempotency_key, Some(Value::from("k1")));
    }

    #[test]
    fn test_mistyped_fields_still_deserialize() {
        let request: SubmissionRequest = serde_json::from_str(
            r#"{"chain": null, "to": 5, "from_address": true, "data": 7, "idempotency_key": 7}"#,
        )
        .unwrap();
        assert_eq!(request.chain, "");
        assert_eq!(request.to, "5");
        assert_eq!(request.from.as_deref(), Some("true"));
        assert_eq!(request.data.as_deref(), Some("7"));
        assert_eq!(request.idempotency_key, Some(Value::from(7u64)));
    }
}

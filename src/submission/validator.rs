//! Request validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//! chain, recipient address, sender address, value, calldata,
//! idempotency key.
//! Validation is pure; it never touches the store or the submitter.

use alloy::primitives::{hex, Bytes, U256};
use serde_json::Value;

use crate::blockchain::{Chain, Transfer};
use crate::config::{ChainsConfig, GatewayConfig};
use crate::submission::error::{ValidationError, ValidationErrorKind};
use crate::submission::types::SubmissionRequest;

/// Data-driven request validator.
#[derive(Debug, Clone)]
pub struct Validator {
    chains: ChainsConfig,
    max_key_length: usize,
}

impl Validator {
    /// Create a validator from per-chain rules and a key length bound.
    pub fn new(chains: ChainsConfig, max_key_length: usize) -> Self {
        Self {
            chains,
            max_key_length,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.chains.clone(), config.idempotency.max_key_length)
    }

    /// Validate `request`, producing the transfer it describes.
    pub fn validate(&self, request: &SubmissionRequest) -> Result<Transfer, ValidationError> {
        let chain = self.check_chain(&request.chain)?;
        let to = self.check_address(chain, "to", &request.to)?;
        let from = request
            .from
            .as_deref()
            .map(|from| self.check_address(chain, "from", from))
            .transpose()?;
        let value = check_value(&request.value)?;
        let data = check_data(request.data.as_deref())?;
        let idempotency_key = self.check_key(request.idempotency_key.as_ref())?;

        Ok(Transfer {
            chain,
            to,
            from,
            value,
            data,
            idempotency_key,
        })
    }

    fn check_chain(&self, literal: &str) -> Result<Chain, ValidationError> {
        let invalid = || {
            ValidationError::new(
                ValidationErrorKind::InvalidChain,
                "chain",
                format!("unsupported chain '{literal}'"),
            )
        };
        let chain: Chain = literal.parse().map_err(|_| invalid())?;
        if !self.chains.contains_key(&chain) {
            return Err(invalid());
        }
        Ok(chain)
    }

    fn check_address(
        &self,
        chain: Chain,
        field: &'static str,
        address: &str,
    ) -> Result<String, ValidationError> {
        // check_chain guarantees the rule exists.
        let format = self.chains.get(&chain).map(|c| &c.address);
        match format {
            Some(format) if format.matches(address) => Ok(address.to_string()),
            Some(format) => Err(ValidationError::new(
                ValidationErrorKind::InvalidAddress,
                field,
                format!(
                    "expected '{}' followed by {} hex digits",
                    format.prefix, format.hex_digits
                ),
            )),
            None => Err(ValidationError::new(
                ValidationErrorKind::InvalidChain,
                "chain",
                format!("no address rule for '{chain}'"),
            )),
        }
    }

    fn check_key(&self, key: Option<&Value>) -> Result<String, ValidationError> {
        let invalid = |detail: String| {
            ValidationError::new(
                ValidationErrorKind::InvalidIdempotencyKey,
                "idempotency_key",
                detail,
            )
        };
        let key = match key {
            None | Some(Value::Null) => return Err(invalid("missing".to_string())),
            Some(Value::String(key)) => key,
            Some(_) => return Err(invalid("must be a string".to_string())),
        };
        if key.trim().is_empty() {
            return Err(invalid("must not be empty".to_string()));
        }
        let length = key.chars().count();
        if length > self.max_key_length {
            return Err(invalid(format!(
                "{length} characters exceeds the limit of {}",
                self.max_key_length
            )));
        }
        Ok(key.to_string())
    }
}

fn check_value(value: &Value) -> Result<U256, ValidationError> {
    let invalid = |detail: &str| {
        ValidationError::new(ValidationErrorKind::InvalidValue, "value", detail.to_string())
    };
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(U256::from(v))
            } else if n.as_i64().is_some() {
                Err(invalid("must not be negative"))
            } else if n.as_f64().is_some_and(|f| f < 0.0) {
                Err(invalid("must not be negative"))
            } else {
                Err(invalid("must be an integer up to u64::MAX; use a decimal string for larger amounts"))
            }
        }
        Value::String(s) => {
            if s.starts_with('-') {
                return Err(invalid("must not be negative"));
            }
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("must be a base-10 integer"));
            }
            U256::from_str_radix(s, 10).map_err(|_| invalid("does not fit in 256 bits"))
        }
        Value::Null => Err(invalid("missing")),
        _ => Err(invalid("must be numeric")),
    }
}

fn check_data(data: Option<&str>) -> Result<Bytes, ValidationError> {
    let Some(data) = data else {
        return Ok(Bytes::new());
    };
    let invalid = |detail: &str| {
        ValidationError::new(ValidationErrorKind::InvalidData, "data", detail.to_string())
    };
    let digits = data
        .strip_prefix("0x")
        .ok_or_else(|| invalid("must start with 0x"))?;
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|_| invalid("must be an even number of hex digits"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_chains;
    use crate::config::{AddressFormat, ChainConfig};

    const TO: &str = "0x2222222222222222222222222222222222222222";

    fn validator() -> Validator {
        Validator::new(default_chains(), 128)
    }

    fn kind_of(request: SubmissionRequest) -> ValidationErrorKind {
        validator().validate(&request).unwrap_err().kind
    }

    #[test]
    fn test_valid_request() {
        let request = SubmissionRequest::new("ethereum", TO, 10u64, "k1").with_data("0xdeadbeef");
        let transfer = validator().validate(&request).unwrap();
        assert_eq!(transfer.chain, Chain::Ethereum);
        assert_eq!(transfer.to, TO);
        assert_eq!(transfer.value, U256::from(10u64));
        assert_eq!(transfer.data, Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(transfer.idempotency_key, "k1");
    }

    #[test]
    fn test_chain_rules() {
        assert_eq!(
            kind_of(SubmissionRequest::new("bitcoin", TO, 1u64, "k")),
            ValidationErrorKind::InvalidChain
        );
        assert_eq!(
            kind_of(SubmissionRequest::new("Polygon", TO, 1u64, "k")),
            ValidationErrorKind::InvalidChain
        );
        assert_eq!(
            kind_of(SubmissionRequest::new("", TO, 1u64, "k")),
            ValidationErrorKind::InvalidChain
        );

        // Known literal without a configured rule is disabled.
        let mut chains = default_chains();
        chains.remove(&Chain::Polygon);
        let err = Validator::new(chains, 128)
            .validate(&SubmissionRequest::new("polygon", TO, 1u64, "k"))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidChain);
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // Everything is wrong; the chain is reported.
        let request = SubmissionRequest {
            chain: "bitcoin".into(),
            to: "nope".into(),
            from: Some("nope".into()),
            value: Value::from(-1i64),
            data: Some("zz".into()),
            idempotency_key: None,
        };
        assert_eq!(kind_of(request.clone()), ValidationErrorKind::InvalidChain);

        let request = SubmissionRequest {
            chain: "sepolia".into(),
            ..request
        };
        let err = validator().validate(&request).unwrap_err();
        assert_eq!((err.kind, err.field), (ValidationErrorKind::InvalidAddress, "to"));

        let request = SubmissionRequest {
            to: TO.into(),
            ..request
        };
        let err = validator().validate(&request).unwrap_err();
        assert_eq!((err.kind, err.field), (ValidationErrorKind::InvalidAddress, "from"));

        let request = SubmissionRequest {
            from: None,
            ..request
        };
        assert_eq!(kind_of(request.clone()), ValidationErrorKind::InvalidValue);

        let request = SubmissionRequest {
            value: Value::from(0u64),
            ..request
        };
        assert_eq!(kind_of(request.clone()), ValidationErrorKind::InvalidData);

        let request = SubmissionRequest {
            data: None,
            ..request
        };
        assert_eq!(kind_of(request), ValidationErrorKind::InvalidIdempotencyKey);
    }

    #[test]
    fn test_address_rules() {
        for bad in ["", "0x", "2222222222222222222222222222222222222222", "0x22", "0xgg22222222222222222222222222222222222222"] {
            assert_eq!(
                kind_of(SubmissionRequest::new("ethereum", bad, 1u64, "k")),
                ValidationErrorKind::InvalidAddress,
                "{bad} should be rejected"
            );
        }

        let mut chains = default_chains();
        chains.insert(
            Chain::Sepolia,
            ChainConfig {
                chain_id: 11_155_111,
                address: AddressFormat {
                    prefix: "0x".into(),
                    hex_digits: 4,
                },
            },
        );
        let validator = Validator::new(chains, 128);
        assert!(validator
            .validate(&SubmissionRequest::new("sepolia", "0xbeef", 1u64, "k"))
            .is_ok());
        assert!(validator
            .validate(&SubmissionRequest::new("ethereum", "0xbeef", 1u64, "k"))
            .is_err());
    }

    #[test]
    fn test_sender_address() {
        let from = "0x1111111111111111111111111111111111111111";
        let transfer = validator()
            .validate(&SubmissionRequest::new("polygon", TO, 1u64, "k").with_from(from))
            .unwrap();
        assert_eq!(transfer.from.as_deref(), Some(from));

        let transfer = validator()
            .validate(&SubmissionRequest::new("polygon", TO, 1u64, "k"))
            .unwrap();
        assert_eq!(transfer.from, None);

        let err = validator()
            .validate(&SubmissionRequest::new("polygon", TO, 1u64, "k").with_from("0x11"))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidAddress);
        assert_eq!(err.field, "from");
    }

    #[test]
    fn test_value_rules() {
        let value_of = |value: Value| {
            validator().validate(&SubmissionRequest::new("ethereum", TO, value, "k"))
        };

        assert_eq!(value_of(Value::from(0u64)).unwrap().value, U256::ZERO);
        assert_eq!(
            value_of(Value::from("115792089237316195423570985008687907853269984665640564039457584007913129639935"))
                .unwrap()
                .value,
            U256::MAX
        );

        for bad in [
            Value::from(-1i64),
            Value::from(-0.5f64),
            Value::from(1.5f64),
            Value::from("-3"),
            Value::from("ten"),
            Value::from(""),
            Value::from(true),
            Value::Null,
            serde_json::json!([1]),
            Value::from("115792089237316195423570985008687907853269984665640564039457584007913129639936"),
        ] {
            let err = value_of(bad.clone()).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::InvalidValue, "{bad} should be rejected");
        }
    }

    #[test]
    fn test_data_rules() {
        let data_of = |data: &str| {
            validator().validate(&SubmissionRequest::new("ethereum", TO, 1u64, "k").with_data(data))
        };
        assert_eq!(data_of("0x").unwrap().data, Bytes::new());
        assert_eq!(data_of("0xabc").unwrap_err().kind, ValidationErrorKind::InvalidData);
        assert_eq!(data_of("abcd").unwrap_err().kind, ValidationErrorKind::InvalidData);
    }

    #[test]
    fn test_key_rules() {
        let key_of = |key: Option<Value>| {
            let mut request = SubmissionRequest::new("ethereum", TO, 1u64, "");
            request.idempotency_key = key;
            validator().validate(&request)
        };

        assert!(key_of(Some("a".repeat(128).into())).is_ok());
        for bad in [
            None,
            Some(Value::Null),
            Some(Value::from("")),
            Some(Value::from("   ")),
            Some(Value::from("a".repeat(129))),
            Some(Value::from(7u64)),
            Some(serde_json::json!(["k"])),
        ] {
            assert_eq!(
                key_of(bad).unwrap_err().kind,
                ValidationErrorKind::InvalidIdempotencyKey
            );
        }
        // Length is counted in characters, not bytes.
        assert!(key_of(Some("é".repeat(128).into())).is_ok());
    }
}

//! Required-field checks shared by the entity constructors.
//!
//! Raw inputs follow loose presence rules: a field counts as missing when it
//! is absent or null, and for "truthy" checks also when it is `false`, `0`,
//! `NaN` or an empty string.

use common::ObjectId;
use serde_json::Value;

use crate::error::{DomainError, Result};
use crate::money::Money;

/// Returns true for values that count as present under the truthy rule.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Builds and logs a [`DomainError::MissingRequiredField`].
pub fn missing(entity: &'static str, field: &'static str) -> DomainError {
    tracing::warn!(entity, field, "required field is missing");
    DomainError::MissingRequiredField { entity, field }
}

/// Requires a non-empty string.
pub fn require_text<'a>(entity: &'static str, field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(missing(entity, field));
    }
    Ok(value)
}

/// Requires a value that is truthy.
pub fn require_truthy<'a>(entity: &'static str, field: &'static str, value: &'a Value) -> Result<&'a Value> {
    if !is_truthy(value) {
        return Err(missing(entity, field));
    }
    Ok(value)
}

/// Requires a value that is not null. Zero and `false` are accepted.
pub fn require_non_null<'a>(
    entity: &'static str,
    field: &'static str,
    value: &'a Value,
) -> Result<&'a Value> {
    if value.is_null() {
        return Err(missing(entity, field));
    }
    Ok(value)
}

/// Parses a reference that is known to be present.
pub fn parse_id(entity: &'static str, field: &'static str, raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|source| {
        tracing::error!(entity, field, value = raw, error = %source, "invalid identifier");
        DomainError::InvalidIdentifier {
            entity,
            field,
            value: raw.to_string(),
            source,
        }
    })
}

/// Requires a reference and parses it.
pub fn require_id(entity: &'static str, field: &'static str, raw: &str) -> Result<ObjectId> {
    require_text(entity, field, raw)?;
    parse_id(entity, field, raw)
}

/// Parses a monetary value that is known to be present.
pub fn parse_money(entity: &'static str, field: &'static str, raw: &Value) -> Result<Money> {
    Money::parse(raw).map_err(|err| {
        tracing::error!(entity, field, value = %err.raw, "invalid monetary value");
        DomainError::InvalidMonetaryValue {
            entity,
            field,
            value: err.raw,
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthiness_follows_loose_rules() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn require_text_rejects_empty() {
        let err = require_text("category", "name", "").unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingRequiredField { entity: "category", field: "name" }
        ));
        assert_eq!(require_text("category", "name", "Console").unwrap(), "Console");
    }

    #[test]
    fn require_non_null_accepts_zero() {
        assert!(require_non_null("product", "price", &json!(0)).is_ok());
        assert!(require_non_null("product", "price", &json!(null)).is_err());
    }

    #[test]
    fn require_id_distinguishes_missing_from_malformed() {
        assert!(matches!(
            require_id("cart", "user_id", ""),
            Err(DomainError::MissingRequiredField { .. })
        ));
        assert!(matches!(
            require_id("cart", "user_id", "123"),
            Err(DomainError::InvalidIdentifier { .. })
        ));
        assert!(require_id("cart", "user_id", "65a1b2c3d4e5f60718293a4b").is_ok());
    }

    #[test]
    fn parse_money_reports_field() {
        let err = parse_money("payment", "amount", &json!("ten")).unwrap_err();
        match err {
            DomainError::InvalidMonetaryValue { entity, field, value } => {
                assert_eq!(entity, "payment");
                assert_eq!(field, "amount");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

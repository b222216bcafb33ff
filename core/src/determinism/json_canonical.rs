use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

// Canonical bytes used for audit hashing:
// - keys sorted lexicographically at every depth
// - compact output, no insignificant whitespace
// - integers only; fractional values must be carried as strings
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    let normalized = normalize_value(v)?;
    Ok(serde_json::to_string(&normalized)?.into_bytes())
}

fn normalize_value(v: Value) -> CoreResult<Value> {
    match v {
        Value::Object(map) => {
            let mut sorted: BTreeMap<String, Value> = BTreeMap::new();
            for (k, vv) in map {
                sorted.insert(k, normalize_value(vv)?);
            }
            Ok(Value::Object(sorted.into_iter().collect()))
        }
        Value::Array(arr) => arr
            .into_iter()
            .map(normalize_value)
            .collect::<CoreResult<Vec<_>>>()
            .map(Value::Array),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(Value::Number(n))
            } else {
                Err(CoreError::InvalidInput(
                    "canonical JSON forbids non-integer numbers".to_string(),
                ))
            }
        }
        other => Ok(other),
    }
}

/// Fixed two-decimal rendering for fractional values that must stay canonical.
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

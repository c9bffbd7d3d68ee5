//! `deserialize_with` helpers for loosely typed Mailchimp payloads
//!
//! Mailchimp is inconsistent about types: ids come back as numbers or
//! strings, rates as floats, nulls where objects are documented. These
//! helpers accept whatever arrives and settle on the field's zero value.
//! Plain nullable fields use `serde_aux::field_attributes::deserialize_default_from_null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize `T` out of a borrowed payload, or `T::default()` when the
/// payload has the wrong shape altogether.
pub fn read_or_default<'de, T>(payload: &'de Value) -> T
where
    T: Deserialize<'de> + Default,
{
    T::deserialize(payload).unwrap_or_default()
}

/// String or number as a string; null and anything else as empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if b { "1".to_string() } else { String::new() }),
        _ => None,
    })
}

/// Integer, truncating floats and parsing numeric strings.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_int(&Value::deserialize(deserializer)?))
}

/// Object of flags (`{"abc123": true}`), each value read with [`is_truthy`].
pub fn flag_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), is_truthy(v))).collect(),
        _ => BTreeMap::new(),
    })
}

fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Loose truthiness used for merge-field flags and interest maps.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

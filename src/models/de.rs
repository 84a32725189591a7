//! Lenient deserializers for loosely typed form data.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts strings and numbers; blank strings and other types become `None`.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts non-negative integers or numeric strings.
pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(as_i64)
        .and_then(|n| u32::try_from(n).ok()))
}

/// Collects integer ids from an array, skipping entries that are not ids
/// and dropping duplicates while keeping the first-seen order.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut ids = Vec::new();
    if let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? {
        for id in items.iter().filter_map(as_i64) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

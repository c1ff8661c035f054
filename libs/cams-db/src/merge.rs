//! Helpers for read-merge-write updates.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::adapter::DocumentPatch;

fn to_object<V: Serialize>(value: &V) -> anyhow::Result<DocumentPatch> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a JSON object, got {other}"),
    }
}

/// Serialize `value` into a patch, leaving out `excluded` keys and null values.
///
/// # Errors
///
/// Returns an error if `value` does not serialize to a JSON object.
pub fn patch_from<V: Serialize>(value: &V, excluded: &[&str]) -> anyhow::Result<DocumentPatch> {
    let mut patch = to_object(value)?;
    patch.retain(|key, v| !v.is_null() && !excluded.contains(&key.as_str()));
    Ok(patch)
}

/// Shallow-merge the non-null attributes of `update` over `existing`, never touching
/// `immutable` keys.
///
/// # Errors
///
/// Returns an error if either side does not serialize to an object or the merged
/// document no longer deserializes into `T`.
pub fn merge_mutable<T, U>(existing: &T, update: &U, immutable: &[&str]) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
    U: Serialize,
{
    let mut merged = to_object(existing)?;
    merged.extend(patch_from(update, immutable)?);
    Ok(serde_json::from_value(serde_json::Value::Object(merged))?)
}

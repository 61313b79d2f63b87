//! Path helpers for reading native upstream payloads.
//!
//! A [`Series`](crate::types::Series) keeps the raw upstream record around.
//! These helpers walk it with dot notation, where numeric segments index into
//! arrays, so accessors can pull `authors.0.name` or `images.jpg.image_url`
//! without declaring a struct for every field.
//!
//! # Examples
//!
//! ```rust
//! use yomu::net::json;
//! use serde_json::json;
//!
//! let record = json!({
//!     "score": 9.47,
//!     "authors": [{"name": "Miura, Kentarou"}],
//!     "images": {"jpg": {"image_url": "https://cdn.example/1.jpg"}}
//! });
//!
//! assert_eq!(json::extract_str(&record, "authors.0.name"), Some("Miura, Kentarou"));
//! assert_eq!(json::extract_f64(&record, "score"), Some(9.47));
//! assert!(json::extract_path(&record, "images.webp").is_none());
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Walks `path` through nested objects and arrays.
pub fn extract_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;

    for key in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            other => other.get(key)?,
        };
    }

    Some(current)
}

/// Extracts and deserializes the value at `path`.
///
/// # Errors
///
/// * [`Error::Parse`](crate::Error::Parse) - if the path doesn't exist
/// * [`Error::Json`](crate::Error::Json) - if deserialization fails
pub fn extract_as<T>(json: &Value, path: &str) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    let value = extract_path(json, path)
        .ok_or_else(|| crate::Error::parse(format!("Path not found: {}", path)))?;
    T::deserialize(value).map_err(Into::into)
}

/// The array at `path`, or an empty slice when missing or not an array.
pub fn extract_array<'a>(json: &'a Value, path: &str) -> &'a [Value] {
    extract_path(json, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A non-empty string at `path`.
pub fn extract_str<'a>(json: &'a Value, path: &str) -> Option<&'a str> {
    extract_path(json, path)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub fn extract_f64(json: &Value, path: &str) -> Option<f64> {
    extract_path(json, path).and_then(Value::as_f64)
}

pub fn extract_u64(json: &Value, path: &str) -> Option<u64> {
    extract_path(json, path).and_then(Value::as_u64)
}

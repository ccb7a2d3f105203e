use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// The part of a response one resource keeps.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// A JSON array; usually homogeneous records.
    Records(Vec<Value>),
    /// A single JSON object.
    Object(Map<String, Value>),
    /// A bare value, e.g. `total_players`.
    Scalar(Value),
}

/// Walks `key` through nested objects and takes ownership of the value found there.
///
/// `url` is only used to label a [`Error::MissingKey`].
pub fn extract(json: Value, key: &[&str], url: &str) -> Result<Fragment> {
    let mut current = json;
    for (depth, segment) in key.iter().enumerate() {
        current = match current {
            Value::Object(mut map) => map.remove(*segment),
            _ => None,
        }
        .ok_or_else(|| Error::MissingKey {
            url: url.to_string(),
            key: key[..=depth].join("."),
        })?;
    }

    Ok(match current {
        Value::Array(records) => Fragment::Records(records),
        Value::Object(object) => Fragment::Object(object),
        scalar => Fragment::Scalar(scalar),
    })
}

/// Like [`extract`], but borrows `json`, so one response can serve several resources.
pub fn extract_ref(json: &Value, key: &[&str], url: &str) -> Result<Fragment> {
    let found = key
        .iter()
        .try_fold(json, |current, segment| current.get(*segment))
        .ok_or_else(|| Error::MissingKey {
            url: url.to_string(),
            key: key.join("."),
        })?;

    extract(found.clone(), &[], url)
}

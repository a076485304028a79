//! Writing record changes back onto stored documents
//!
//! Re-encoding a record does not reproduce its stored body: `null` fields
//! decode to `None` and are skipped on write, and modelled fields come out
//! in declaration order. Changes are therefore persisted as a patch of the
//! stored body, touching only the top-level fields a mutation changed.

use serde_json::Value;

use crate::error::DocumentError;

/// Apply the top-level difference between `before` and `after` to `stored`
///
/// `before` and `after` encode the same record ahead of and after a
/// mutation. Fields they agree on keep their stored value and position.
/// Changed fields are replaced in place, new fields are appended, and fields
/// missing from `after` are removed.
///
/// # Errors
/// `DocumentError::NotAnObject` if any of the three is not a JSON object
pub fn patch_document(stored: Value, before: &Value, after: &Value) -> Result<Value, DocumentError> {
    let Value::Object(mut fields) = stored else {
        return Err(DocumentError::NotAnObject);
    };
    let (Some(before), Some(after)) = (before.as_object(), after.as_object()) else {
        return Err(DocumentError::NotAnObject);
    };

    for (key, value) in after {
        if before.get(key) != Some(value) {
            fields.insert(key.clone(), value.clone());
        }
    }
    for key in before.keys() {
        if !after.contains_key(key) {
            fields.shift_remove(key);
        }
    }
    Ok(Value::Object(fields))
}

//! Save payload construction
//!
//! Turns validated form values into the payload handed to the data-access
//! collaborator: the placeholder sentinel is stripped for creates, and
//! association-typed fields are normalized to sets of associated-record
//! primary keys for updates.

use serde_json::{Map, Value};

use crate::shared::metadata::{Cardinality, FieldSchema, FieldType};

/// Reserved primary-key value of a not-yet-created placeholder row
pub const NEW_RECORD_ID: &str = "__new__";

pub fn is_placeholder(record: &Value, primary_key: &str) -> bool {
    record
        .get(primary_key)
        .and_then(Value::as_str)
        .map(|id| id == NEW_RECORD_ID)
        .unwrap_or(false)
}

/// Remove the sentinel primary key before a create call
pub fn strip_sentinel(values: &mut Value, primary_key: &str) {
    if is_placeholder(values, primary_key) {
        if let Some(map) = values.as_object_mut() {
            map.remove(primary_key);
        }
    }
}

/// Normalize every association-typed field of `values` to primary keys
///
/// A single association `{"owner": {"id": 7}}` becomes `{"ownerId": 7}`;
/// a multiple association becomes an array of keys in selection order; a
/// cleared association writes `null` / an empty array so the server unsets it.
/// A record that never materialized the association field (loaded records
/// carry only the stored parent key) is left untouched: absent is not
/// cleared. Plain nested objects are normalized recursively.
pub fn normalize_associations(fields: &[FieldSchema], values: &Value) -> Value {
    let Some(source) = values.as_object() else {
        return values.clone();
    };

    let mut result: Map<String, Value> = source.clone();

    for field in fields {
        if let Some(association) = &field.association {
            let Some(raw) = result.remove(&field.name) else {
                continue;
            };
            let normalized = match association.cardinality {
                Cardinality::Single => extract_key(&raw, &association.associated_id_field_name),
                Cardinality::Multiple => Value::Array(
                    raw.as_array()
                        .map(|items| {
                            items
                                .iter()
                                .map(|item| {
                                    extract_key(item, &association.associated_id_field_name)
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                ),
            };
            result.insert(association.parent_id_field_name.clone(), normalized);
        } else if field.field_type == FieldType::NestedObject {
            if let Some(nested) = source.get(&field.name) {
                if !nested.is_null() {
                    result.insert(
                        field.name.clone(),
                        normalize_associations(&field.nested_fields, nested),
                    );
                }
            }
        }
    }

    Value::Object(result)
}

fn extract_key(value: &Value, id_field: &str) -> Value {
    match value {
        Value::Object(map) => map.get(id_field).cloned().unwrap_or(Value::Null),
        // Already a bare key (or null for a cleared selection)
        other => other.clone(),
    }
}

//! Reconciliation of unknown properties against loaded data
//!
//! When an existing record is loaded into a form, every unknown-capable node
//! regenerates its [`Unknowns`] entries by diffing the record's own keys
//! against the statically known nested-field names of that schema node,
//! recursively per nested object. Without this pass, previously-saved
//! unmodeled data would be invisible and silently dropped on the next save,
//! so it runs before first render of a loaded record.

use std::collections::BTreeSet;

use serde_json::Value;

use super::field_path::FieldPath;
use super::unknowns::{UnknownEntry, UnknownType, Unknowns};
use super::value_path;
use crate::shared::metadata::{FieldSchema, FieldType};

/// Infer the primitive type of a loaded value
pub fn infer_unknown_type(value: &Value) -> UnknownType {
    match value {
        Value::Bool(_) => UnknownType::Boolean,
        Value::Number(_) => UnknownType::Number,
        Value::String(s) => {
            if chrono::DateTime::parse_from_rfc3339(s).is_ok() {
                UnknownType::DateTime
            } else {
                UnknownType::String
            }
        }
        _ => UnknownType::String,
    }
}

/// Regenerate unknown entries for a loaded record
///
/// `fields` is the schema of the object at `path` (the root schema for the
/// whole record). Produces exactly one entry per unrecognized key, attached
/// to the node's unknown-properties field.
pub fn reconcile_unknowns(
    fields: &[FieldSchema],
    record: &Value,
    path: &FieldPath,
    unknowns: &mut Unknowns,
) {
    let object = if path.is_root() {
        Some(record)
    } else {
        value_path::get(record, path.name_path())
    };
    let Some(object) = object.and_then(Value::as_object) else {
        return;
    };

    if let Some(catch_all) = fields
        .iter()
        .find(|f| f.field_type == FieldType::UnknownProperties)
    {
        let known: BTreeSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let entries: Vec<UnknownEntry> = object
            .iter()
            .filter(|(key, _)| !known.contains(key.as_str()))
            .map(|(key, value)| UnknownEntry::named(key.clone(), infer_unknown_type(value)))
            .collect();
        unknowns.override_entries(&path.child(&catch_all.name), entries);
    }

    for field in fields {
        match field.field_type {
            FieldType::NestedObject if field.association.is_none() => {
                reconcile_unknowns(&field.nested_fields, record, &path.child(&field.name), unknowns);
            }
            FieldType::Array if field.association.is_none() => {
                let field_path = path.child(&field.name);
                let len = value_path::get(record, field_path.name_path())
                    .and_then(Value::as_array)
                    .map(Vec::len)
                    .unwrap_or(0);
                for index in 0..len {
                    reconcile_unknowns(
                        &field.nested_fields,
                        record,
                        &field_path.item(index as u64, index),
                        unknowns,
                    );
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn station_schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("id", "Id", FieldType::Input),
            FieldSchema::new("serial", "Serial", FieldType::Input),
            FieldSchema::new(
                "vendor_config",
                "Vendor configuration",
                FieldType::UnknownProperties,
            ),
            FieldSchema::new("position", "Position", FieldType::NestedObject).with_nested(vec![
                FieldSchema::new("lat", "Latitude", FieldType::Number),
                FieldSchema::new("lon", "Longitude", FieldType::Number),
                FieldSchema::new("extras", "Extras", FieldType::UnknownProperties),
            ]),
        ]
    }

    #[test]
    fn test_one_entry_per_extra_key() {
        let record = json!({
            "id": "s1",
            "serial": "A-1",
            "HeartbeatInterval": 300,
            "AllowOfflineTx": true,
            "position": {"lat": 52.1, "lon": 13.4}
        });

        let mut unknowns = Unknowns::new();
        reconcile_unknowns(&station_schema(), &record, &FieldPath::root(), &mut unknowns);

        let entries = unknowns.entries(&FieldPath::root().child("vendor_config"));
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&UnknownEntry::named("AllowOfflineTx", UnknownType::Boolean)));
        assert!(entries.contains(&UnknownEntry::named("HeartbeatInterval", UnknownType::Number)));
    }

    #[test]
    fn test_nested_objects_reconcile_recursively() {
        let record = json!({
            "id": "s1",
            "serial": "A-1",
            "position": {"lat": 52.1, "lon": 13.4, "altitude": 34.0}
        });

        let mut unknowns = Unknowns::new();
        reconcile_unknowns(&station_schema(), &record, &FieldPath::root(), &mut unknowns);

        let entries = unknowns.entries(&FieldPath::root().child("position").child("extras"));
        assert_eq!(
            entries,
            &[UnknownEntry::named("altitude", UnknownType::Number)]
        );
    }

    #[test]
    fn test_no_extra_keys_leaves_node_empty() {
        let record = json!({"id": "s1", "serial": "A-1"});
        let mut unknowns = Unknowns::new();
        reconcile_unknowns(&station_schema(), &record, &FieldPath::root(), &mut unknowns);
        assert!(unknowns
            .entries(&FieldPath::root().child("vendor_config"))
            .is_empty());
    }

    #[test]
    fn test_reconciliation_replaces_stale_entries() {
        let mut unknowns = Unknowns::new();
        let node = FieldPath::root().child("vendor_config");
        unknowns.override_entries(&node, vec![UnknownEntry::named("Stale", UnknownType::String)]);

        let record = json!({"id": "s1", "serial": "A-1", "MeterValueSampleInterval": "60"});
        reconcile_unknowns(&station_schema(), &record, &FieldPath::root(), &mut unknowns);

        assert_eq!(
            unknowns.entries(&node),
            &[UnknownEntry::named("MeterValueSampleInterval", UnknownType::String)]
        );
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_unknown_type(&json!(true)), UnknownType::Boolean);
        assert_eq!(infer_unknown_type(&json!(42)), UnknownType::Number);
        assert_eq!(infer_unknown_type(&json!("plain")), UnknownType::String);
        assert_eq!(
            infer_unknown_type(&json!("2026-08-24T10:00:00Z")),
            UnknownType::DateTime
        );
    }
}

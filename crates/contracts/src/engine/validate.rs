//! Client-side record validation
//!
//! Walks a schema against a record and collects per-field errors. This is the
//! first error class: a non-empty result blocks submission entirely and never
//! produces a network call.

use serde_json::Value;

use super::field_path::FieldPath;
use super::value_path;
use crate::shared::metadata::{Cardinality, FieldSchema, FieldType};

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: FieldPath,
    pub label: String,
    pub message: String,
}

/// Validate all fields of a record against its schema
pub fn validate_record(fields: &[FieldSchema], record: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_at(fields, record, &FieldPath::root(), &mut errors);
    errors
}

fn validate_at(
    fields: &[FieldSchema],
    record: &Value,
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    for field in fields {
        // Overridden fields carry no validatable value of their own
        if field.custom_render.is_some() {
            continue;
        }

        let field_path = path.child(&field.name);
        let value = value_path::get(record, field_path.name_path());

        if let Some(association) = &field.association {
            validate_association_value(field, association.cardinality, value, &field_path, errors);
            continue;
        }

        match field.field_type {
            FieldType::NestedObject => {
                if field.is_required && matches!(value, None | Some(Value::Null)) {
                    push_error(errors, &field_path, field, format!("{} is required", field.label));
                } else if value.is_some() {
                    validate_at(&field.nested_fields, record, &field_path, errors);
                }
            }
            FieldType::Array => {
                let items = value.and_then(Value::as_array);
                if field.is_required && items.map(Vec::is_empty).unwrap_or(true) {
                    push_error(errors, &field_path, field, format!("{} is required", field.label));
                }
                if let Some(items) = items {
                    for (index, _) in items.iter().enumerate() {
                        // Stable ids do not matter for validation addressing
                        let item_path = field_path.item(index as u64, index);
                        validate_at(&field.nested_fields, record, &item_path, errors);
                    }
                }
            }
            FieldType::Unknown
            | FieldType::UnknownProperty
            | FieldType::UnknownProperties
            | FieldType::CustomRender => {
                // Dynamically-typed slots validate only through user action
            }
            _ => {
                if let Err(message) = field.validation.validate_value(value, &field.label) {
                    push_error(errors, &field_path, field, message);
                }
            }
        }
    }
}

fn validate_association_value(
    field: &FieldSchema,
    cardinality: Cardinality,
    value: Option<&Value>,
    field_path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    if !field.is_required {
        return;
    }
    let missing = match (cardinality, value) {
        (_, None) | (_, Some(Value::Null)) => true,
        (Cardinality::Multiple, Some(Value::Array(items))) => items.is_empty(),
        _ => false,
    };
    if missing {
        push_error(errors, field_path, field, format!("{} is required", field.label));
    }
}

fn push_error(
    errors: &mut Vec<ValidationError>,
    path: &FieldPath,
    field: &FieldSchema,
    message: String,
) {
    errors.push(ValidationError {
        path: path.clone(),
        label: field.label.clone(),
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{AssociationDescriptor, ValidationRules};
    use serde_json::json;

    fn widget_schema() -> Vec<FieldSchema> {
        let mut name = FieldSchema::new("name", "Name", FieldType::Input).required();
        name.is_required = true;

        let mut owner = FieldSchema::new("owner", "Owner", FieldType::NestedObject)
            .with_association(
                AssociationDescriptor::new("owner", "ownerId", "id", Cardinality::Single)
                    .with_queries("ownerOne", "ownerList"),
            )
            .required();
        owner.is_required = true;

        vec![name, owner]
    }

    #[test]
    fn test_missing_required_fields_are_reported() {
        let errors = validate_record(&widget_schema(), &json!({"name": "", "owner": null}));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].label, "Name");
        assert_eq!(errors[1].label, "Owner");
    }

    #[test]
    fn test_valid_record_produces_no_errors() {
        let errors = validate_record(
            &widget_schema(),
            &json!({"name": "Pump", "owner": {"id": 7}}),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_nested_object_fields_are_validated() {
        let mut lat = FieldSchema::new("lat", "Latitude", FieldType::Number)
            .with_validation(ValidationRules::required());
        lat.is_required = true;
        let position =
            FieldSchema::new("position", "Position", FieldType::NestedObject).with_nested(vec![lat]);

        let errors = validate_record(&[position], &json!({"position": {"lat": null}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].label, "Latitude");
    }

    #[test]
    fn test_array_items_are_validated_positionally() {
        let mut standard = FieldSchema::new("standard", "Standard", FieldType::Input)
            .with_validation(ValidationRules::required());
        standard.is_required = true;
        let connectors = FieldSchema::new("connectors", "Connectors", FieldType::Array)
            .with_nested(vec![standard]);

        let errors = validate_record(
            &[connectors],
            &json!({"connectors": [{"standard": "CCS"}, {"standard": ""}]}),
        );
        assert_eq!(errors.len(), 1);
        use crate::engine::field_path::PathSegment;
        assert_eq!(
            errors[0].path.name_path(),
            &[
                PathSegment::key("connectors"),
                PathSegment::Index(1),
                PathSegment::key("standard")
            ]
        );
    }

    #[test]
    fn test_required_multiple_association_rejects_empty_set() {
        let mut stations = FieldSchema::new("stations", "Stations", FieldType::Array)
            .with_association(
                AssociationDescriptor::new("charging_station", "stationIds", "id", Cardinality::Multiple)
                    .with_queries("stationOne", "stationList"),
            );
        stations.is_required = true;

        let errors = validate_record(&[stations.clone()], &json!({"stations": []}));
        assert_eq!(errors.len(), 1);

        let errors = validate_record(&[stations], &json!({"stations": [{"id": 1}]}));
        assert!(errors.is_empty());
    }
}

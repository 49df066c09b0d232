//! Schema extraction
//!
//! Turns a registered resource into a `Vec<FieldSchema>`. A single field
//! whose factory fails is logged and excluded; extraction never aborts
//! wholesale for one bad field.

use std::fmt;

use serde_json::Value;

use super::registry::SchemaRegistry;
use super::types::FieldSchema;

/// Nesting deeper than this indicates a schema cycle; the offending
/// subtree is dropped like any other unreadable field
const MAX_NESTING: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    UnknownResource(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResource(resource) => {
                write!(f, "resource '{}' is not registered", resource)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract the field schema of a registered resource
///
/// Required-ness is not declared directly: each field's validation rules are
/// run against the entity's empty record, and any field that fails validation
/// on the empty instance is marked required. Custom-render fields bypass this
/// and are returned verbatim.
pub fn extract(registry: &SchemaRegistry, resource: &str) -> Result<Vec<FieldSchema>, ExtractError> {
    let descriptor = registry
        .get(resource)
        .ok_or_else(|| ExtractError::UnknownResource(resource.to_string()))?;

    let empty = (descriptor.empty_record)();
    let mut fields = Vec::with_capacity(descriptor.fields.len());

    for factory in &descriptor.fields {
        match factory() {
            Ok(mut field) => {
                mark_required(&mut field, &empty, 0);
                fields.push(field);
            }
            Err(e) => {
                log::warn!("schema field skipped for '{}': {}", resource, e);
            }
        }
    }

    Ok(fields)
}

fn mark_required(field: &mut FieldSchema, empty_record: &Value, depth: usize) {
    if field.custom_render.is_some() {
        // Overridden fields are passed through untouched
        return;
    }

    if depth >= MAX_NESTING {
        log::warn!(
            "field '{}' exceeds maximum nesting depth, dropping its subtree",
            field.name
        );
        field.nested_fields.clear();
        return;
    }

    let empty_value = empty_record.get(&field.name);
    field.is_required = field
        .validation
        .validate_value(empty_value, &field.label)
        .is_err();

    let nested_empty = empty_value.cloned().unwrap_or(Value::Null);
    for nested in &mut field.nested_fields {
        mark_required(nested, &nested_empty, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::registry::EntityDescriptor;
    use crate::shared::metadata::types::{CustomRender, CustomRendered};
    use crate::shared::metadata::{FieldType, ValidationRules};
    use serde_json::json;

    fn widget_registry() -> SchemaRegistry {
        fn name_field() -> Result<FieldSchema, String> {
            Ok(FieldSchema::new("name", "Name", FieldType::Input).required())
        }
        fn power_field() -> Result<FieldSchema, String> {
            Ok(FieldSchema::new("power", "Power", FieldType::Number)
                .with_validation(ValidationRules::none().with_range(Some(0.0), None)))
        }
        fn broken_field() -> Result<FieldSchema, String> {
            Err("unreadable metadata".to_string())
        }
        fn badge_field() -> Result<FieldSchema, String> {
            Ok(
                FieldSchema::new("badge", "Badge", FieldType::CustomRender).with_custom_render(
                    CustomRender::new(|_| CustomRendered::text("badge")),
                ),
            )
        }

        let mut registry = SchemaRegistry::new();
        registry.register(
            EntityDescriptor::new("widget", "Widget", "Widgets")
                .with_fields(vec![name_field, power_field, broken_field, badge_field])
                .with_empty_record(|| json!({"name": "", "power": null})),
        );
        registry
    }

    #[test]
    fn test_extract_is_deterministic() {
        let registry = widget_registry();
        let a = extract(&registry, "widget").unwrap();
        let b = extract(&registry, "widget").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_required_derived_from_empty_instance() {
        let registry = widget_registry();
        let fields = extract(&registry, "widget").unwrap();

        let name = fields.iter().find(|f| f.name == "name").unwrap();
        assert!(name.is_required);

        let power = fields.iter().find(|f| f.name == "power").unwrap();
        assert!(!power.is_required);
    }

    #[test]
    fn test_bad_field_is_skipped_not_fatal() {
        let registry = widget_registry();
        let fields = extract(&registry, "widget").unwrap();
        assert_eq!(fields.len(), 3);
        assert!(!fields.iter().any(|f| f.name == "broken"));
    }

    #[test]
    fn test_custom_render_passes_through_verbatim() {
        let registry = widget_registry();
        let fields = extract(&registry, "widget").unwrap();
        let badge = fields.iter().find(|f| f.name == "badge").unwrap();
        assert_eq!(badge.field_type, FieldType::CustomRender);
        assert!(badge.custom_render.is_some());
        assert!(!badge.is_required);
    }

    #[test]
    fn test_unknown_resource() {
        let registry = widget_registry();
        assert_eq!(
            extract(&registry, "missing"),
            Err(ExtractError::UnknownResource("missing".to_string()))
        );
    }

    #[test]
    fn test_all_registered_resources_extract() {
        let registry = crate::shared::metadata::registry::global();
        for resource in registry.resources() {
            let fields = extract(registry, resource).unwrap();
            assert!(!fields.is_empty(), "{} has no fields", resource);
        }
    }
}

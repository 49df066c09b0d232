//! Static schema registry
//!
//! A builder table mapping resource names to [`EntityDescriptor`] values.
//! Field factories are plain function pointers, so a registered schema is a
//! compile-time artifact with no runtime reflection side-table.

use std::collections::BTreeMap;

use serde_json::Value;

use super::types::FieldSchema;

/// Builds one field's schema; a failing factory is logged and skipped
/// by the extractor instead of aborting the whole schema
pub type FieldFactory = fn() -> Result<FieldSchema, String>;

/// Builds the empty record validation and placeholder rows start from
pub type EmptyRecordFactory = fn() -> Value;

/// Table-level metadata for one editable resource
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// External-system name records are fetched/mutated under
    pub resource: String,
    /// Singular UI label
    pub element_name: String,
    /// Plural UI label
    pub list_name: String,
    /// Primary-key field name
    pub primary_key: String,
    pub list_query: Option<String>,
    pub get_one_query: Option<String>,
    pub create_mutation: Option<String>,
    pub update_mutation: Option<String>,
    pub fields: Vec<FieldFactory>,
    pub empty_record: EmptyRecordFactory,
}

impl EntityDescriptor {
    pub fn new(
        resource: impl Into<String>,
        element_name: impl Into<String>,
        list_name: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            element_name: element_name.into(),
            list_name: list_name.into(),
            primary_key: "id".to_string(),
            list_query: None,
            get_one_query: None,
            create_mutation: None,
            update_mutation: None,
            fields: Vec::new(),
            empty_record: || Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_queries(mut self, list: impl Into<String>, get_one: impl Into<String>) -> Self {
        self.list_query = Some(list.into());
        self.get_one_query = Some(get_one.into());
        self
    }

    pub fn with_mutations(
        mut self,
        create: impl Into<String>,
        update: impl Into<String>,
    ) -> Self {
        self.create_mutation = Some(create.into());
        self.update_mutation = Some(update.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldFactory>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_empty_record(mut self, empty_record: EmptyRecordFactory) -> Self {
        self.empty_record = empty_record;
        self
    }
}

/// Registry of all editable resources, keyed by resource name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, EntityDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: EntityDescriptor) {
        self.entries.insert(descriptor.resource.clone(), descriptor);
    }

    pub fn get(&self, resource: &str) -> Option<&EntityDescriptor> {
        self.entries.get(resource)
    }

    /// Registered resource names, in stable order
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The application-wide registry with all built-in domain resources
pub fn global() -> &'static SchemaRegistry {
    use once_cell::sync::Lazy;

    static GLOBAL: Lazy<SchemaRegistry> = Lazy::new(crate::domain::builtin_registry);
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(EntityDescriptor::new("widget", "Widget", "Widgets"));

        assert_eq!(registry.len(), 1);
        let desc = registry.get("widget").unwrap();
        assert_eq!(desc.primary_key, "id");
        assert_eq!(desc.element_name, "Widget");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_global_registry_contains_domain_resources() {
        let registry = global();
        assert!(registry.get("location").is_some());
        assert!(registry.get("charging_station").is_some());
        assert!(registry.get("ocpp_tag").is_some());
    }
}

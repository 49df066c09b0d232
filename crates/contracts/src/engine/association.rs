//! Association resolution support
//!
//! Builds the candidate-lookup plan for an association field, keeps interim
//! picker selections alive across re-renders, and summarizes current values.
//! The selection cache is keyed by a per-instance [`FormSessionId`] plus the
//! field's stable key path, so two forms over the same class can never read
//! each other's interim selections.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::field_path::{FieldPath, PathKey};
use super::provider::{DataProvider, ListParams};
use crate::shared::metadata::{AssociationDescriptor, Cardinality, FieldSchema, FieldType};

/// Identity of one form/table instance within the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormSessionId(Uuid);

impl FormSessionId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Interim picker selections, session-scoped, last-write-wins
#[derive(Debug, Clone, Default)]
pub struct SelectionCache {
    entries: HashMap<(FormSessionId, PathKey), Vec<Value>>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, session: FormSessionId, path: &FieldPath, selection: Vec<Value>) {
        self.entries.insert((session, path.key_owned()), selection);
    }

    pub fn get(&self, session: FormSessionId, path: &FieldPath) -> Option<&[Value]> {
        self.entries
            .get(&(session, path.key_owned()))
            .map(Vec::as_slice)
    }

    /// Remove and return the selection once the owning form commits it
    pub fn take(&mut self, session: FormSessionId, path: &FieldPath) -> Option<Vec<Value>> {
        self.entries.remove(&(session, path.key_owned()))
    }

    /// Drop everything belonging to one form instance
    pub fn clear_session(&mut self, session: FormSessionId) {
        self.entries.retain(|(owner, _), _| *owner != session);
    }
}

/// A validated candidate lookup derived from an association descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationPlan {
    pub resource: String,
    pub list_query: String,
    pub id_field: String,
    pub cardinality: Cardinality,
    /// Query variables computed from the parent record, if a provider was given
    pub variables: Option<Value>,
}

impl AssociationPlan {
    pub fn list_params(&self) -> ListParams {
        ListParams {
            variables: self.variables.clone(),
            ..ListParams::default()
        }
    }
}

/// Build the lookup plan, naming every missing required attribute
///
/// A descriptor without a list query or key-field names cannot resolve
/// candidates; the caller renders an inline error identifying the missing
/// attributes instead of failing silently.
pub fn plan(
    descriptor: &AssociationDescriptor,
    parent_record: &Value,
) -> Result<AssociationPlan, Vec<&'static str>> {
    let mut missing = Vec::new();
    if descriptor.associated_resource.is_empty() {
        missing.push("associatedResource");
    }
    if descriptor.list_query.is_none() {
        missing.push("listQuery");
    }
    if descriptor.parent_id_field_name.is_empty() {
        missing.push("parentIdFieldName");
    }
    if descriptor.associated_id_field_name.is_empty() {
        missing.push("associatedIdFieldName");
    }
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(AssociationPlan {
        resource: descriptor.associated_resource.clone(),
        list_query: descriptor.list_query.clone().unwrap_or_default(),
        id_field: descriptor.associated_id_field_name.clone(),
        cardinality: descriptor.cardinality,
        variables: descriptor
            .query_variables
            .as_ref()
            .map(|provide| provide(parent_record)),
    })
}

/// Rehydrate the association fields of a loaded record
///
/// Loaded records carry associations in parent-key form (`ownerId`,
/// `stationIds`). For every association field absent from the record, the
/// stored key(s) are looked up through the provider's get-one query and the
/// full object(s) placed under the field name, so summaries and picker
/// preselection see the current value. A failed lookup falls back to a stub
/// carrying only the key, which normalization round-trips unchanged. Plain
/// nested objects are hydrated recursively.
pub fn hydrate_record<'a>(
    provider: &'a dyn DataProvider,
    fields: &'a [FieldSchema],
    record: &'a Value,
) -> Pin<Box<dyn Future<Output = Value> + 'a>> {
    Box::pin(async move {
        let Some(source) = record.as_object() else {
            return record.clone();
        };
        let mut result = source.clone();

        for field in fields {
            if let Some(descriptor) = &field.association {
                let already_present = result
                    .get(&field.name)
                    .map(|value| !value.is_null())
                    .unwrap_or(false);
                if already_present {
                    continue;
                }
                let Some(stored) = source.get(&descriptor.parent_id_field_name) else {
                    continue;
                };
                let hydrated = match descriptor.cardinality {
                    Cardinality::Single => {
                        if stored.is_null() {
                            continue;
                        }
                        fetch_associated(provider, descriptor, stored).await
                    }
                    Cardinality::Multiple => {
                        let Some(ids) = stored.as_array() else {
                            continue;
                        };
                        let mut items = Vec::with_capacity(ids.len());
                        for id in ids {
                            items.push(fetch_associated(provider, descriptor, id).await);
                        }
                        Value::Array(items)
                    }
                };
                result.insert(field.name.clone(), hydrated);
            } else if field.field_type == FieldType::NestedObject {
                if let Some(nested) = source.get(&field.name) {
                    if !nested.is_null() {
                        let hydrated =
                            hydrate_record(provider, &field.nested_fields, nested).await;
                        result.insert(field.name.clone(), hydrated);
                    }
                }
            }
        }

        Value::Object(result)
    })
}

async fn fetch_associated(
    provider: &dyn DataProvider,
    descriptor: &AssociationDescriptor,
    id: &Value,
) -> Value {
    match provider
        .get_one(
            &descriptor.associated_resource,
            id,
            descriptor.get_one_query.as_deref(),
        )
        .await
    {
        Ok(record) => record,
        Err(e) => {
            log::warn!(
                "association lookup on '{}' failed: {}",
                descriptor.associated_resource,
                e
            );
            let mut stub = Map::new();
            stub.insert(descriptor.associated_id_field_name.clone(), id.clone());
            Value::Object(stub)
        }
    }
}

/// Compact summary/tag text for the current association value
pub fn summarize(value: Option<&Value>, descriptor: &AssociationDescriptor) -> String {
    match value {
        None | Some(Value::Null) => "—".to_string(),
        Some(Value::Array(items)) => {
            if items.is_empty() {
                "—".to_string()
            } else {
                items
                    .iter()
                    .map(|item| summarize_one(item, descriptor))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        Some(single) => summarize_one(single, descriptor),
    }
}

fn summarize_one(value: &Value, descriptor: &AssociationDescriptor) -> String {
    // A bare key (not yet hydrated) is shown as-is
    if let Value::String(key) = value {
        return key.clone();
    }
    // Prefer a human-readable field, fall back to the key
    for candidate in ["description", "name", "label"] {
        if let Some(text) = value.get(candidate).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    match value.get(&descriptor.associated_id_field_name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> AssociationDescriptor {
        AssociationDescriptor::new("location", "locationId", "id", Cardinality::Single)
            .with_queries("locationOne", "locationList")
    }

    #[test]
    fn test_plan_carries_query_variables() {
        let descriptor = descriptor()
            .with_query_variables(|record| json!({"country": record.get("country").cloned()}));
        let plan = plan(&descriptor, &json!({"country": "DE"})).unwrap();
        assert_eq!(plan.resource, "location");
        assert_eq!(plan.variables, Some(json!({"country": "DE"})));
    }

    #[test]
    fn test_plan_names_each_missing_attribute() {
        let mut incomplete = descriptor();
        incomplete.list_query = None;
        incomplete.associated_id_field_name = String::new();

        let missing = plan(&incomplete, &Value::Null).unwrap_err();
        assert_eq!(missing, vec!["listQuery", "associatedIdFieldName"]);
    }

    #[test]
    fn test_cache_is_scoped_per_form_instance() {
        let mut cache = SelectionCache::new();
        let path = FieldPath::root().child("location");
        let form_a = FormSessionId::new();
        let form_b = FormSessionId::new();

        cache.set(form_a, &path, vec![json!({"id": 1})]);

        // Same field path, different form instance: no bleed-through
        assert!(cache.get(form_b, &path).is_none());
        assert_eq!(cache.get(form_a, &path).unwrap().len(), 1);
    }

    #[test]
    fn test_cache_take_and_clear() {
        let mut cache = SelectionCache::new();
        let path = FieldPath::root().child("location");
        let form = FormSessionId::new();

        cache.set(form, &path, vec![json!({"id": 1})]);
        assert_eq!(cache.take(form, &path).unwrap().len(), 1);
        assert!(cache.get(form, &path).is_none());

        cache.set(form, &path, vec![json!({"id": 2})]);
        cache.clear_session(form);
        assert!(cache.get(form, &path).is_none());
    }

    #[test]
    fn test_summarize_prefers_readable_field() {
        let d = descriptor();
        assert_eq!(summarize(Some(&json!({"id": 7, "name": "Depot"})), &d), "Depot");
        assert_eq!(summarize(Some(&json!({"id": 7})), &d), "7");
        assert_eq!(summarize(None, &d), "—");
        assert_eq!(
            summarize(Some(&json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}])), &d),
            "A, B"
        );
    }

    #[test]
    fn test_summarize_shows_bare_keys_unquoted() {
        let d = descriptor();
        assert_eq!(summarize(Some(&json!("loc-1")), &d), "loc-1");
    }

    mod hydration {
        use super::*;
        use crate::engine::provider::{DataProvider, ListResult, ProviderError};
        use crate::shared::metadata::{FieldSchema, FieldType};
        use async_trait::async_trait;
        use std::cell::Cell;

        struct LookupProvider {
            get_one_calls: Cell<usize>,
            fail: bool,
        }

        impl LookupProvider {
            fn new(fail: bool) -> Self {
                Self {
                    get_one_calls: Cell::new(0),
                    fail,
                }
            }
        }

        #[async_trait(?Send)]
        impl DataProvider for LookupProvider {
            async fn list(
                &self,
                _resource: &str,
                _query: Option<&str>,
                _params: &ListParams,
            ) -> Result<ListResult, ProviderError> {
                Ok(ListResult::default())
            }

            async fn get_one(
                &self,
                resource: &str,
                id: &Value,
                _query: Option<&str>,
            ) -> Result<Value, ProviderError> {
                self.get_one_calls.set(self.get_one_calls.get() + 1);
                if self.fail {
                    return Err(ProviderError::new("lookup failed"));
                }
                Ok(json!({"id": id, "name": format!("{} {}", resource, id.as_str().unwrap_or("?"))}))
            }

            async fn create(
                &self,
                _resource: &str,
                _values: &Value,
                _mutation: Option<&str>,
            ) -> Result<Value, ProviderError> {
                Err(ProviderError::new("unexpected create"))
            }

            async fn update(
                &self,
                _resource: &str,
                _id: &Value,
                _values: &Value,
                _mutation: Option<&str>,
            ) -> Result<Value, ProviderError> {
                Err(ProviderError::new("unexpected update"))
            }
        }

        fn location_field() -> FieldSchema {
            FieldSchema::new("location", "Location", FieldType::NestedObject).with_association(
                AssociationDescriptor::new("location", "locationId", "id", Cardinality::Single)
                    .with_queries("locationOne", "locationList"),
            )
        }

        fn stations_field() -> FieldSchema {
            FieldSchema::new("stations", "Stations", FieldType::Array).with_association(
                AssociationDescriptor::new(
                    "charging_station",
                    "stationIds",
                    "id",
                    Cardinality::Multiple,
                )
                .with_queries("stationOne", "stationList"),
            )
        }

        #[tokio::test]
        async fn test_hydrate_places_objects_for_stored_keys() {
            let provider = LookupProvider::new(false);
            let fields = vec![location_field(), stations_field()];
            let record = json!({"id": "s1", "locationId": "l1", "stationIds": ["a", "b"]});

            let hydrated = hydrate_record(&provider, &fields, &record).await;

            assert_eq!(hydrated["location"]["id"], json!("l1"));
            assert_eq!(hydrated["stations"].as_array().map(Vec::len), Some(2));
            // Stored keys stay in place for the save payload
            assert_eq!(hydrated["locationId"], json!("l1"));
            assert_eq!(provider.get_one_calls.get(), 3);
        }

        #[tokio::test]
        async fn test_hydrate_skips_present_and_null_values() {
            let provider = LookupProvider::new(false);
            let fields = vec![location_field()];
            let record = json!({"location": {"id": "l9", "name": "Depot"}, "locationId": "l9"});

            let hydrated = hydrate_record(&provider, &fields, &record).await;

            assert_eq!(hydrated["location"]["name"], json!("Depot"));
            assert_eq!(provider.get_one_calls.get(), 0);

            let cleared = json!({"locationId": null});
            let hydrated = hydrate_record(&provider, &fields, &cleared).await;
            assert!(hydrated.get("location").is_none());
            assert_eq!(provider.get_one_calls.get(), 0);
        }

        #[tokio::test]
        async fn test_failed_lookup_falls_back_to_key_stub() {
            let provider = LookupProvider::new(true);
            let fields = vec![location_field()];
            let record = json!({"locationId": "l1"});

            let hydrated = hydrate_record(&provider, &fields, &record).await;

            // The stub keeps the key, so normalization round-trips it
            assert_eq!(hydrated["location"], json!({"id": "l1"}));
        }
    }
}

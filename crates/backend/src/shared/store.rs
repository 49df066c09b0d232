//! In-memory record store
//!
//! Records are kept as raw JSON per resource, matching what the form engine
//! edits. Create/update payloads are validated through the typed domain
//! aggregates before they touch the store.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use thiserror::Error;

use contracts::domain::common::EntityMetadata;
use contracts::shared::metadata::registry;

use crate::domain;

static STORE: Lazy<RwLock<HashMap<String, Vec<Value>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource '{0}' is not registered")]
    UnknownResource(String),
    #[error("record '{0}' not found")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Query parameters of a list lookup
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: usize,
    pub per_page: usize,
    pub sort: Option<String>,
    pub descending: bool,
    /// Case-insensitive substring search over string fields
    pub search: Option<String>,
    /// Top-level field equality
    pub filter: Option<Value>,
    /// Association query variables, applied as equality filters
    pub variables: Option<Value>,
}

impl ListQuery {
    pub fn page_or_default(&self) -> usize {
        if self.page == 0 {
            1
        } else {
            self.page
        }
    }

    pub fn per_page_or_default(&self) -> usize {
        if self.per_page == 0 {
            25
        } else {
            self.per_page
        }
    }
}

fn check_resource(resource: &str) -> Result<(), StoreError> {
    if registry::global().get(resource).is_none() {
        return Err(StoreError::UnknownResource(resource.to_string()));
    }
    Ok(())
}

/// List records with filtering, search, sort and pagination
pub fn list(resource: &str, query: &ListQuery) -> Result<(Vec<Value>, usize), StoreError> {
    check_resource(resource)?;
    let store = STORE.read().map_err(|_| StoreError::Poisoned)?;
    let records = store.get(resource).cloned().unwrap_or_default();

    let mut matched: Vec<Value> = records
        .into_iter()
        .filter(|record| {
            matches_equality(record, query.filter.as_ref())
                && matches_equality(record, query.variables.as_ref())
                && matches_search(record, query.search.as_deref())
        })
        .collect();

    if let Some(sort_field) = &query.sort {
        matched.sort_by(|a, b| {
            let ordering = compare_values(a.get(sort_field), b.get(sort_field));
            if query.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let total = matched.len();
    let per_page = query.per_page_or_default();
    let start = (query.page_or_default() - 1) * per_page;
    let items = matched.into_iter().skip(start).take(per_page).collect();

    Ok((items, total))
}

pub fn get_by_id(resource: &str, id: &str) -> Result<Value, StoreError> {
    check_resource(resource)?;
    let store = STORE.read().map_err(|_| StoreError::Poisoned)?;
    store
        .get(resource)
        .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)).cloned())
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

/// Validate and insert a new record, assigning a fresh id
pub fn create(resource: &str, values: &Value) -> Result<Value, StoreError> {
    check_resource(resource)?;
    domain::validate_payload(resource, values).map_err(StoreError::Validation)?;

    let mut record = values.as_object().cloned().unwrap_or_default();
    record.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
    record.insert(
        "metadata".into(),
        serde_json::to_value(EntityMetadata::new()).unwrap_or(Value::Null),
    );
    let record = Value::Object(record);

    let mut store = STORE.write().map_err(|_| StoreError::Poisoned)?;
    store
        .entry(resource.to_string())
        .or_default()
        .push(record.clone());
    Ok(record)
}

/// Validate and merge updated values onto an existing record
pub fn update(resource: &str, id: &str, values: &Value) -> Result<Value, StoreError> {
    check_resource(resource)?;

    let mut store = STORE.write().map_err(|_| StoreError::Poisoned)?;
    let records = store
        .get_mut(resource)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let record = records
        .iter_mut()
        .find(|r| record_id(r) == Some(id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    let mut merged = record.as_object().cloned().unwrap_or_default();
    if let Some(incoming) = values.as_object() {
        for (key, value) in incoming {
            if key != "id" && key != "metadata" {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    let merged_value = Value::Object(merged.clone());
    domain::validate_payload(resource, &merged_value).map_err(StoreError::Validation)?;

    touch_metadata(&mut merged);
    *record = Value::Object(merged);
    Ok(record.clone())
}

pub fn delete(resource: &str, id: &str) -> Result<(), StoreError> {
    check_resource(resource)?;
    let mut store = STORE.write().map_err(|_| StoreError::Poisoned)?;
    let records = store
        .get_mut(resource)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let before = records.len();
    records.retain(|r| record_id(r) != Some(id));
    if records.len() == before {
        return Err(StoreError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Seed the store with demo records on startup
pub fn seed_demo_data() {
    let seeded = match STORE.read() {
        Ok(store) => !store.is_empty(),
        Err(_) => return,
    };
    if seeded {
        return;
    }
    for (resource, records) in domain::demo_records() {
        if let Ok(mut store) = STORE.write() {
            store.insert(resource.to_string(), records);
        }
    }
    tracing::info!("demo data seeded");
}

#[cfg(test)]
pub fn clear_for_tests() {
    if let Ok(mut store) = STORE.write() {
        store.clear();
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn touch_metadata(record: &mut Map<String, Value>) {
    let mut metadata: EntityMetadata = record
        .get("metadata")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    metadata.touch();
    metadata.increment_version();
    record.insert(
        "metadata".into(),
        serde_json::to_value(metadata).unwrap_or(Value::Null),
    );
}

fn matches_equality(record: &Value, filter: Option<&Value>) -> bool {
    let Some(filter) = filter.and_then(Value::as_object) else {
        return true;
    };
    filter
        .iter()
        .all(|(key, expected)| record.get(key) == Some(expected))
}

fn matches_search(record: &Value, search: Option<&str>) -> bool {
    let Some(search) = search.filter(|s| !s.is_empty()) else {
        return true;
    };
    let needle = search.to_lowercase();
    record
        .as_object()
        .map(|fields| {
            fields.values().any(|value| match value {
                Value::String(s) => s.to_lowercase().contains(&needle),
                _ => false,
            })
        })
        .unwrap_or(false)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // The store is process-global; tests serialize access to it
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn fresh() -> MutexGuard<'static, ()> {
        let guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_for_tests();
        seed_demo_data();
        guard
    }

    #[test]
    fn test_demo_data_seeds_every_resource() {
        let _guard = fresh();
        for resource in registry::global().resources() {
            let (_, total) = list(resource, &ListQuery::default()).unwrap();
            assert!(total > 0, "{} has no demo records", resource);
        }
    }

    #[test]
    fn test_create_assigns_id_and_metadata() {
        let _guard = fresh();
        let created = create(
            "location",
            &json!({
                "name": "Depot Ost",
                "address": "Parkweg 2",
                "city": "Dresden",
                "country": "DE"
            }),
        )
        .unwrap();
        assert!(created.get("id").and_then(Value::as_str).is_some());
        assert!(created.get("metadata").is_some());
    }

    #[test]
    fn test_create_rejects_invalid_payload() {
        let _guard = fresh();
        let err = create(
            "location",
            &json!({"name": "", "address": "x", "city": "", "country": "DE"}),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_update_merges_and_bumps_version() {
        let _guard = fresh();
        let created = create(
            "location",
            &json!({
                "name": "Depot West",
                "address": "Ring 9",
                "city": "Köln",
                "country": "DE"
            }),
        )
        .unwrap();
        let id = created["id"].as_str().unwrap();

        let updated = update("location", id, &json!({"city": "Bonn"})).unwrap();
        assert_eq!(updated["city"], json!("Bonn"));
        assert_eq!(updated["name"], json!("Depot West"));
        assert_eq!(updated["metadata"]["version"], json!(1));
    }

    #[test]
    fn test_list_search_sort_and_pagination() {
        let _guard = fresh();
        clear_for_tests();
        for city in ["Aachen", "Berlin", "Bremen"] {
            create(
                "location",
                &json!({
                    "name": format!("Depot {}", city),
                    "address": "Str. 1",
                    "city": city,
                    "country": "DE"
                }),
            )
            .unwrap();
        }

        let query = ListQuery {
            search: Some("bre".into()),
            ..ListQuery::default()
        };
        let (items, total) = list("location", &query).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0]["city"], json!("Bremen"));

        let query = ListQuery {
            sort: Some("city".into()),
            descending: true,
            page: 1,
            per_page: 2,
            ..ListQuery::default()
        };
        let (items, total) = list("location", &query).unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["city"], json!("Bremen"));
    }

    #[test]
    fn test_variables_filter_candidates() {
        let _guard = fresh();
        clear_for_tests();
        create(
            "charging_station",
            &json!({
                "name": "CP-A",
                "serialNumber": "SN-A",
                "model": "", "vendor": "",
                "status": "Available",
                "maxPowerKw": 50.0,
                "isPublic": true,
                "position": {"lat": null, "lon": null},
                "connectors": []
            }),
        )
        .unwrap();
        create(
            "charging_station",
            &json!({
                "name": "CP-B",
                "serialNumber": "SN-B",
                "model": "", "vendor": "",
                "status": "Available",
                "maxPowerKw": 50.0,
                "isPublic": false,
                "position": {"lat": null, "lon": null},
                "connectors": []
            }),
        )
        .unwrap();

        let query = ListQuery {
            variables: Some(json!({"isPublic": true})),
            ..ListQuery::default()
        };
        let (items, total) = list("charging_station", &query).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0]["name"], json!("CP-A"));
    }

    #[test]
    fn test_unknown_resource_is_rejected() {
        let _guard = fresh();
        assert!(matches!(
            list("widget", &ListQuery::default()),
            Err(StoreError::UnknownResource(_))
        ));
    }
}

use serde_json::{json, Value};

use contracts::domain::c001_location::{Location, LocationDto};
use contracts::domain::common::EntityMetadata;

pub fn validate(values: &Value) -> Result<(), String> {
    let dto: LocationDto = serde_json::from_value(values.clone()).map_err(|e| e.to_string())?;
    let mut location = Location::new_for_insert(
        dto.name.clone(),
        dto.address.clone(),
        dto.city.clone(),
        dto.country.clone(),
    );
    location.update(&dto);
    location.validate()
}

pub fn demo_records() -> Vec<Value> {
    let metadata = serde_json::to_value(EntityMetadata::new()).unwrap_or(Value::Null);
    vec![
        json!({
            "id": "6f1b0c1a-8d5e-4a0f-9a44-111111111111",
            "name": "Depot Nord",
            "address": "Industriestr. 5",
            "city": "Berlin",
            "country": "DE",
            "powerLimitKw": 600.0,
            "comment": null,
            "metadata": metadata.clone()
        }),
        json!({
            "id": "6f1b0c1a-8d5e-4a0f-9a44-222222222222",
            "name": "Hafenterminal",
            "address": "Kaistr. 12",
            "city": "Hamburg",
            "country": "DE",
            "powerLimitKw": 350.0,
            "comment": "Access via gate B",
            "metadata": metadata
        }),
    ]
}

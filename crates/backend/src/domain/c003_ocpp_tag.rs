use serde_json::{json, Value};

use contracts::domain::c003_ocpp_tag::{OcppTag, OcppTagDto};
use contracts::domain::common::EntityMetadata;

pub fn validate(values: &Value) -> Result<(), String> {
    let dto: OcppTagDto = serde_json::from_value(values.clone()).map_err(|e| e.to_string())?;
    let mut tag = OcppTag::new_for_insert(dto.name.clone(), dto.id_tag.clone());
    tag.update(&dto);
    tag.validate()
}

pub fn demo_records(stations: &[Value]) -> Vec<Value> {
    let metadata = serde_json::to_value(EntityMetadata::new()).unwrap_or(Value::Null);
    let station_ids: Vec<Value> = stations
        .iter()
        .filter_map(|s| s.get("id").cloned())
        .collect();

    vec![
        json!({
            "id": "9c7d41be-52fa-4b0e-bd6e-cccccccccccc",
            "name": "Fleet card 001",
            "idTag": "FLEET-0001",
            "expiryDate": "2027-01-01T00:00:00Z",
            "blocked": false,
            "parentIdTag": null,
            "stationIds": station_ids,
            "comment": null,
            "metadata": metadata.clone()
        }),
        json!({
            "id": "9c7d41be-52fa-4b0e-bd6e-dddddddddddd",
            "name": "Visitor tag",
            "idTag": "VISIT-0007",
            "expiryDate": null,
            "blocked": true,
            "parentIdTag": "FLEET-0001",
            "stationIds": [],
            "comment": "Blocked after loss report",
            "metadata": metadata
        }),
    ]
}

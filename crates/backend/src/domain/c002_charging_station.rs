use serde_json::{json, Value};

use contracts::domain::c002_charging_station::{ChargingStation, ChargingStationDto};
use contracts::domain::common::EntityMetadata;

pub fn validate(values: &Value) -> Result<(), String> {
    let dto: ChargingStationDto =
        serde_json::from_value(values.clone()).map_err(|e| e.to_string())?;
    let mut station =
        ChargingStation::new_for_insert(dto.name.clone(), dto.serial_number.clone());
    station.update(&dto);
    station.validate()
}

pub fn demo_records(locations: &[Value]) -> Vec<Value> {
    let metadata = serde_json::to_value(EntityMetadata::new()).unwrap_or(Value::Null);
    let location_id = locations
        .first()
        .and_then(|l| l.get("id"))
        .cloned()
        .unwrap_or(Value::Null);

    vec![
        json!({
            "id": "4aa0b7ce-0d5a-4f8e-8e01-aaaaaaaaaaaa",
            "name": "CP Berlin 01",
            "serialNumber": "ALP-2024-0001",
            "model": "Terra 184",
            "vendor": "ABB",
            "status": "Available",
            "maxPowerKw": 180.0,
            "commissionedAt": "2024-11-02T09:00:00Z",
            "isPublic": true,
            "position": {"lat": 52.5315, "lon": 13.3847},
            "connectors": [
                {"connectorId": 1, "standard": "CCS2", "maxCurrentA": 375.0},
                {"connectorId": 2, "standard": "CHAdeMO", "maxCurrentA": 125.0}
            ],
            "locationId": location_id,
            "ocppConfiguration": {
                "HeartbeatInterval": 300,
                "MeterValueSampleInterval": 60
            },
            "comment": null,
            "metadata": metadata.clone()
        }),
        json!({
            "id": "4aa0b7ce-0d5a-4f8e-8e01-bbbbbbbbbbbb",
            "name": "CP Berlin 02",
            "serialNumber": "ALP-2024-0002",
            "model": "Supercharger V3",
            "vendor": "Tesla",
            "status": "Occupied",
            "maxPowerKw": 250.0,
            "commissionedAt": "2025-02-14T12:30:00Z",
            "isPublic": false,
            "position": {"lat": 52.5002, "lon": 13.4251},
            "connectors": [
                {"connectorId": 1, "standard": "CCS2", "maxCurrentA": 500.0}
            ],
            "locationId": location_id,
            "ocppConfiguration": {},
            "comment": "Fleet only",
            "metadata": metadata
        }),
    ]
}

//! Typed validation and demo data per aggregate

pub mod c001_location;
pub mod c002_charging_station;
pub mod c003_ocpp_tag;

use serde_json::Value;

/// Validate a create/update payload through the aggregate's DTO and
/// invariants before it reaches the store
pub fn validate_payload(resource: &str, values: &Value) -> Result<(), String> {
    match resource {
        "location" => c001_location::validate(values),
        "charging_station" => c002_charging_station::validate(values),
        "ocpp_tag" => c003_ocpp_tag::validate(values),
        other => Err(format!("no validator for resource '{}'", other)),
    }
}

/// Demo records inserted at startup, keyed by resource
pub fn demo_records() -> Vec<(&'static str, Vec<Value>)> {
    let locations = c001_location::demo_records();
    let stations = c002_charging_station::demo_records(&locations);
    let tags = c003_ocpp_tag::demo_records(&stations);
    vec![
        ("location", locations),
        ("charging_station", stations),
        ("ocpp_tag", tags),
    ]
}

//! Form/table schema of the charging-station resource
//!
//! The widest schema in the system: primitives of every kind, a nested
//! position group, a repeatable connector list, a location association and
//! the free-form OCPP configuration map.

use serde_json::{json, Value};

use super::aggregate::ChargingStationStatus;
use crate::shared::metadata::{
    AssociationDescriptor, Cardinality, CustomRender, CustomRendered, EntityDescriptor,
    FieldSchema, FieldType, SelectOption, ValidationRules,
};

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new("charging_station", "Charging station", "Charging stations")
        .with_queries("stationList", "stationOne")
        .with_mutations("stationCreate", "stationUpdate")
        .with_fields(vec![
            name_field,
            serial_number_field,
            model_field,
            vendor_field,
            status_field,
            status_badge_field,
            max_power_field,
            commissioned_at_field,
            is_public_field,
            position_field,
            connectors_field,
            location_field,
            ocpp_configuration_field,
            comment_field,
        ])
        .with_empty_record(|| {
            json!({
                "name": "",
                "serialNumber": "",
                "model": "",
                "vendor": "",
                "status": "",
                "maxPowerKw": null,
                "commissionedAt": null,
                "isPublic": false,
                "position": {"lat": null, "lon": null},
                "connectors": [],
                "location": null,
                "ocppConfiguration": {},
                "comment": null
            })
        })
}

fn name_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("name", "Name", FieldType::Input)
        .with_validation(ValidationRules::required().with_length(None, Some(120)))
        .sortable())
}

fn serial_number_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("serialNumber", "Serial number", FieldType::Input)
            .with_validation(ValidationRules::required().with_length(None, Some(64)))
            .sortable(),
    )
}

fn model_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("model", "Model", FieldType::Input))
}

fn vendor_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("vendor", "Vendor", FieldType::Input).sortable())
}

fn status_field() -> Result<FieldSchema, String> {
    let options = ChargingStationStatus::all()
        .iter()
        .map(|status| SelectOption::new(status.as_str(), status.as_str()))
        .collect();
    Ok(FieldSchema::new("status", "Status", FieldType::Select)
        .with_validation(ValidationRules::required())
        .with_options(options)
        .sortable())
}

fn status_badge_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("statusBadge", "Status", FieldType::CustomRender).with_custom_render(
            CustomRender::new(|record| {
                let status = record
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("Unavailable");
                CustomRendered::text(status)
                    .with_class(format!("status-badge status-badge--{}", status.to_lowercase()))
            }),
        ),
    )
}

fn max_power_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("maxPowerKw", "Max power (kW)", FieldType::Number)
            .with_validation(
                ValidationRules::required().with_range(Some(0.0), Some(1000.0)),
            )
            .sortable(),
    )
}

fn commissioned_at_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new(
        "commissionedAt",
        "Commissioned at",
        FieldType::DateTime,
    ))
}

fn is_public_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new(
        "isPublic",
        "Publicly accessible",
        FieldType::Boolean,
    ))
}

fn position_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("position", "Position", FieldType::NestedObject).with_nested(vec![
            FieldSchema::new("lat", "Latitude", FieldType::Number)
                .with_validation(ValidationRules::none().with_range(Some(-90.0), Some(90.0))),
            FieldSchema::new("lon", "Longitude", FieldType::Number)
                .with_validation(ValidationRules::none().with_range(Some(-180.0), Some(180.0))),
        ]),
    )
}

fn connectors_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("connectors", "Connectors", FieldType::Array).with_nested(vec![
            FieldSchema::new("connectorId", "Connector id", FieldType::Number)
                .with_validation(ValidationRules::required().with_range(Some(1.0), None)),
            FieldSchema::new("standard", "Standard", FieldType::Select)
                .with_validation(ValidationRules::required())
                .with_options(vec![
                    SelectOption::new("CCS2", "CCS Combo 2"),
                    SelectOption::new("CHAdeMO", "CHAdeMO"),
                    SelectOption::new("Type2", "Type 2"),
                ]),
            FieldSchema::new("maxCurrentA", "Max current (A)", FieldType::Number)
                .with_validation(ValidationRules::none().with_range(Some(0.0), Some(1000.0))),
        ]),
    )
}

fn location_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("location", "Location", FieldType::NestedObject).with_association(
            AssociationDescriptor::new("location", "locationId", "id", Cardinality::Single)
                .with_queries("locationOne", "locationList"),
        ),
    )
}

fn ocpp_configuration_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new(
        "ocppConfiguration",
        "OCPP configuration",
        FieldType::NestedObject,
    )
    .with_nested(vec![FieldSchema::new(
        "entries",
        "Configuration keys",
        FieldType::UnknownProperties,
    )]))
}

fn comment_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("comment", "Comment", FieldType::Input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{extract, SchemaRegistry};

    fn fields() -> Vec<FieldSchema> {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor());
        extract::extract(&registry, "charging_station").unwrap()
    }

    #[test]
    fn test_required_fields_derive_from_empty_record() {
        let required: Vec<String> = fields()
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(required, vec!["name", "serialNumber", "status", "maxPowerKw"]);
    }

    #[test]
    fn test_connector_items_require_id_and_standard() {
        let all = fields();
        let connectors = all.iter().find(|f| f.name == "connectors").unwrap();
        let required: Vec<&str> = connectors
            .nested_fields
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(required, vec!["connectorId", "standard"]);
    }

    #[test]
    fn test_location_association_is_complete() {
        let all = fields();
        let location = all.iter().find(|f| f.name == "location").unwrap();
        let association = location.association.as_ref().unwrap();
        assert_eq!(association.associated_resource, "location");
        assert_eq!(association.parent_id_field_name, "locationId");
        assert_eq!(association.cardinality, Cardinality::Single);
        assert!(association.list_query.is_some());
    }

    #[test]
    fn test_status_badge_renders_with_status_class() {
        let all = fields();
        let badge = all.iter().find(|f| f.name == "statusBadge").unwrap();
        let rendered = badge
            .custom_render
            .as_ref()
            .unwrap()
            .render(&json!({"status": "Faulted"}));
        assert_eq!(rendered.text, "Faulted");
        assert_eq!(
            rendered.class.as_deref(),
            Some("status-badge status-badge--faulted")
        );
    }
}

//! Form/table schema of the OCPP tag resource

use serde_json::json;

use crate::shared::metadata::{
    AssociationDescriptor, Cardinality, EntityDescriptor, FieldSchema, FieldType, ValidationRules,
};

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new("ocpp_tag", "OCPP tag", "OCPP tags")
        .with_queries("tagList", "tagOne")
        .with_mutations("tagCreate", "tagUpdate")
        .with_fields(vec![
            name_field,
            id_tag_field,
            expiry_date_field,
            blocked_field,
            parent_id_tag_field,
            stations_field,
            comment_field,
        ])
        .with_empty_record(|| {
            json!({
                "name": "",
                "idTag": "",
                "expiryDate": null,
                "blocked": false,
                "parentIdTag": null,
                "stations": [],
                "comment": null
            })
        })
}

fn name_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("name", "Name", FieldType::Input)
        .with_validation(ValidationRules::required().with_length(None, Some(120)))
        .sortable())
}

fn id_tag_field() -> Result<FieldSchema, String> {
    // 20-character limit per OCPP 1.6 IdToken
    Ok(FieldSchema::new("idTag", "idTag", FieldType::Input)
        .with_validation(ValidationRules::required().with_length(None, Some(20)))
        .sortable())
}

fn expiry_date_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new(
        "expiryDate",
        "Expiry date",
        FieldType::DateTime,
    ))
}

fn blocked_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("blocked", "Blocked", FieldType::Boolean).sortable())
}

fn parent_id_tag_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("parentIdTag", "Parent idTag", FieldType::Input)
            .with_validation(ValidationRules::none().with_length(None, Some(20))),
    )
}

fn stations_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("stations", "Valid at stations", FieldType::Array).with_association(
            AssociationDescriptor::new("charging_station", "stationIds", "id", Cardinality::Multiple)
                .with_queries("stationOne", "stationList")
                // Tags are only assignable to publicly accessible stations
                .with_query_variables(|_record| json!({"isPublic": true})),
        ),
    )
}

fn comment_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("comment", "Comment", FieldType::Input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{extract, SchemaRegistry};

    #[test]
    fn test_stations_association_is_multiple() {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor());
        let fields = extract::extract(&registry, "ocpp_tag").unwrap();

        let stations = fields.iter().find(|f| f.name == "stations").unwrap();
        let association = stations.association.as_ref().unwrap();
        assert_eq!(association.cardinality, Cardinality::Multiple);
        assert_eq!(association.parent_id_field_name, "stationIds");
        assert!(association.query_variables.is_some());
    }

    #[test]
    fn test_id_tag_is_required_and_bounded() {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor());
        let fields = extract::extract(&registry, "ocpp_tag").unwrap();

        let id_tag = fields.iter().find(|f| f.name == "idTag").unwrap();
        assert!(id_tag.is_required);
        assert_eq!(id_tag.validation.max_length, Some(20));
    }
}

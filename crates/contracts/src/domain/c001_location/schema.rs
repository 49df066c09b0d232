//! Form/table schema of the location resource

use serde_json::json;

use crate::shared::metadata::{
    EntityDescriptor, FieldSchema, FieldType, SelectOption, ValidationRules,
};

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new("location", "Location", "Locations")
        .with_queries("locationList", "locationOne")
        .with_mutations("locationCreate", "locationUpdate")
        .with_fields(vec![
            name_field,
            address_field,
            city_field,
            country_field,
            power_limit_field,
            comment_field,
        ])
        .with_empty_record(|| {
            json!({
                "name": "",
                "address": "",
                "city": "",
                "country": "",
                "powerLimitKw": null,
                "comment": null
            })
        })
}

fn name_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("name", "Name", FieldType::Input)
        .with_validation(ValidationRules::required().with_length(None, Some(120)))
        .sortable())
}

fn address_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("address", "Address", FieldType::Input)
        .with_validation(ValidationRules::required()))
}

fn city_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("city", "City", FieldType::Input).sortable())
}

fn country_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("country", "Country", FieldType::Select)
        .with_validation(ValidationRules::required())
        .with_options(vec![
            SelectOption::new("DE", "Germany"),
            SelectOption::new("NL", "Netherlands"),
            SelectOption::new("FR", "France"),
            SelectOption::new("PL", "Poland"),
            SelectOption::new("AT", "Austria"),
        ])
        .sortable())
}

fn power_limit_field() -> Result<FieldSchema, String> {
    Ok(
        FieldSchema::new("powerLimitKw", "Power limit (kW)", FieldType::Number)
            .with_validation(ValidationRules::none().with_range(Some(0.0), Some(100_000.0))),
    )
}

fn comment_field() -> Result<FieldSchema, String> {
    Ok(FieldSchema::new("comment", "Comment", FieldType::Input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::extract;
    use crate::shared::metadata::SchemaRegistry;

    #[test]
    fn test_required_fields_derive_from_empty_record() {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor());
        let fields = extract::extract(&registry, "location").unwrap();

        let required: Vec<&str> = fields
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(required, vec!["name", "address", "country"]);
    }
}

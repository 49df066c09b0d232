use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::shared::metadata::EntityDescriptor;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a charging location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub Uuid);

impl LocationId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for LocationId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(LocationId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A physical site hosting one or more charging stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub base: BaseAggregate<LocationId>,

    pub address: String,
    pub city: String,
    /// ISO 3166-1 alpha-2 code
    pub country: String,

    /// Grid connection limit shared by the site's stations, in kW
    #[serde(rename = "powerLimitKw")]
    pub power_limit_kw: Option<f64>,
}

impl Location {
    pub fn new_for_insert(name: String, address: String, city: String, country: String) -> Self {
        Self {
            base: BaseAggregate::new(LocationId::new_v4(), name),
            address,
            city,
            country,
            power_limit_kw: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply form values from a DTO
    pub fn update(&mut self, dto: &LocationDto) {
        self.base.name = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.address = dto.address.clone();
        self.city = dto.city.clone();
        self.country = dto.country.clone();
        self.power_limit_kw = dto.power_limit_kw;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if self.address.trim().is_empty() {
            return Err("Address must not be empty".into());
        }
        if self.country.trim().len() != 2 {
            return Err("Country must be an ISO 3166-1 alpha-2 code".into());
        }
        if let Some(limit) = self.power_limit_kw {
            if !(0.0..=100_000.0).contains(&limit) {
                return Err("Power limit must be between 0 and 100000 kW".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Location {
    type Id = LocationId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn name(&self) -> &str {
        &self.base.name
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "c001"
    }

    fn resource() -> &'static str {
        "location"
    }

    fn element_name() -> &'static str {
        "Location"
    }

    fn list_name() -> &'static str {
        "Locations"
    }

    fn origin() -> Origin {
        Origin::Console
    }

    fn descriptor() -> EntityDescriptor {
        super::schema::descriptor()
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationDto {
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,

    #[serde(rename = "powerLimitKw")]
    pub power_limit_kw: Option<f64>,

    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_country_code() {
        let mut location = Location::new_for_insert(
            "Depot Nord".into(),
            "Industriestr. 5".into(),
            "Berlin".into(),
            "DEU".into(),
        );
        assert!(location.validate().is_err());

        location.country = "DE".into();
        assert!(location.validate().is_ok());
    }

    #[test]
    fn test_update_from_dto() {
        let mut location = Location::new_for_insert(
            "Depot Nord".into(),
            "Industriestr. 5".into(),
            "Berlin".into(),
            "DE".into(),
        );
        let dto = LocationDto {
            name: "Depot Süd".into(),
            address: "Hafenstr. 12".into(),
            city: "Hamburg".into(),
            country: "DE".into(),
            power_limit_kw: Some(350.0),
            ..LocationDto::default()
        };

        location.update(&dto);
        assert_eq!(location.base.name, "Depot Süd");
        assert_eq!(location.power_limit_kw, Some(350.0));
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::c002_charging_station::ChargingStationId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::shared::metadata::EntityDescriptor;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of an authorization tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OcppTagId(pub Uuid);

impl OcppTagId {
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

impl AggregateId for OcppTagId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OcppTagId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// An RFID/virtual tag authorizing charging sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcppTag {
    #[serde(flatten)]
    pub base: BaseAggregate<OcppTagId>,

    /// OCPP idTag, at most 20 characters
    #[serde(rename = "idTag")]
    pub id_tag: String,

    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(default)]
    pub blocked: bool,

    /// Group parent per OCPP 1.6 (e.g. a fleet master tag)
    #[serde(rename = "parentIdTag")]
    pub parent_id_tag: Option<String>,

    /// Stations the tag is valid at; empty means valid everywhere
    #[serde(rename = "stationIds", default)]
    pub station_ids: Vec<ChargingStationId>,
}

impl OcppTag {
    pub fn new_for_insert(name: String, id_tag: String) -> Self {
        Self {
            base: BaseAggregate::new(OcppTagId::new_v4(), name),
            id_tag,
            expiry_date: None,
            blocked: false,
            parent_id_tag: None,
            station_ids: Vec::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply form values from a DTO
    pub fn update(&mut self, dto: &OcppTagDto) {
        self.base.name = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.id_tag = dto.id_tag.clone();
        self.expiry_date = dto.expiry_date;
        self.blocked = dto.blocked;
        self.parent_id_tag = dto.parent_id_tag.clone();
        self.station_ids = dto.station_ids.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if self.id_tag.trim().is_empty() {
            return Err("idTag must not be empty".into());
        }
        if self.id_tag.chars().count() > 20 {
            return Err("idTag must not exceed 20 characters".into());
        }
        if let Some(parent) = &self.parent_id_tag {
            if parent == &self.id_tag {
                return Err("A tag cannot be its own parent".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for OcppTag {
    type Id = OcppTagId;

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
        "c003"
    }

    fn resource() -> &'static str {
        "ocpp_tag"
    }

    fn element_name() -> &'static str {
        "OCPP tag"
    }

    fn list_name() -> &'static str {
        "OCPP tags"
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

/// DTO for creating/updating a tag
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OcppTagDto {
    pub id: Option<String>,
    pub name: String,

    #[serde(rename = "idTag")]
    pub id_tag: String,

    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(default)]
    pub blocked: bool,

    #[serde(rename = "parentIdTag")]
    pub parent_id_tag: Option<String>,

    #[serde(rename = "stationIds", default)]
    pub station_ids: Vec<ChargingStationId>,

    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_enforces_id_tag_length() {
        let mut tag = OcppTag::new_for_insert("Fleet card".into(), "FLEET-0001".into());
        assert!(tag.validate().is_ok());

        tag.id_tag = "X".repeat(21);
        assert!(tag.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_self_parent() {
        let mut tag = OcppTag::new_for_insert("Fleet card".into(), "FLEET-0001".into());
        tag.parent_id_tag = Some("FLEET-0001".into());
        assert!(tag.validate().is_err());
    }
}

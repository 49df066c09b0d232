use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::c001_location::LocationId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::shared::metadata::EntityDescriptor;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a charging station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChargingStationId(pub Uuid);

impl ChargingStationId {
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

impl AggregateId for ChargingStationId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ChargingStationId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// OCPP 1.6 charge point status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChargingStationStatus {
    Available,
    Occupied,
    Faulted,
    #[default]
    Unavailable,
}

impl ChargingStationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::Faulted => "Faulted",
            Self::Unavailable => "Unavailable",
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::Available,
            Self::Occupied,
            Self::Faulted,
            Self::Unavailable,
        ]
    }
}

impl std::fmt::Display for ChargingStationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geographic position of the station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One physical connector of the station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Connector {
    #[serde(rename = "connectorId")]
    pub connector_id: u32,
    /// Plug standard, e.g. "CCS2"
    pub standard: String,
    #[serde(rename = "maxCurrentA")]
    pub max_current_a: Option<f64>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A charge point managed by the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    #[serde(flatten)]
    pub base: BaseAggregate<ChargingStationId>,

    #[serde(rename = "serialNumber")]
    pub serial_number: String,

    pub model: String,
    pub vendor: String,
    pub status: ChargingStationStatus,

    #[serde(rename = "maxPowerKw")]
    pub max_power_kw: Option<f64>,

    #[serde(rename = "commissionedAt")]
    pub commissioned_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(rename = "isPublic")]
    pub is_public: bool,

    pub position: Position,
    pub connectors: Vec<Connector>,

    /// Owning site
    #[serde(rename = "locationId")]
    pub location_id: Option<LocationId>,

    /// OCPP configuration keys reported by the station; the key set is not
    /// known at compile time
    #[serde(rename = "ocppConfiguration", default)]
    pub ocpp_configuration: Map<String, Value>,
}

impl ChargingStation {
    pub fn new_for_insert(name: String, serial_number: String) -> Self {
        Self {
            base: BaseAggregate::new(ChargingStationId::new_v4(), name),
            serial_number,
            model: String::new(),
            vendor: String::new(),
            status: ChargingStationStatus::Unavailable,
            max_power_kw: None,
            commissioned_at: None,
            is_public: false,
            position: Position::default(),
            connectors: Vec::new(),
            location_id: None,
            ocpp_configuration: Map::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply form values from a DTO
    pub fn update(&mut self, dto: &ChargingStationDto) {
        self.base.name = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.serial_number = dto.serial_number.clone();
        self.model = dto.model.clone();
        self.vendor = dto.vendor.clone();
        self.status = dto.status;
        self.max_power_kw = dto.max_power_kw;
        self.commissioned_at = dto.commissioned_at;
        self.is_public = dto.is_public;
        self.position = dto.position;
        self.connectors = dto.connectors.clone();
        self.location_id = dto.location_id;
        self.ocpp_configuration = dto.ocpp_configuration.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if self.serial_number.trim().is_empty() {
            return Err("Serial number must not be empty".into());
        }
        if let Some(power) = self.max_power_kw {
            if !(0.0..=1000.0).contains(&power) {
                return Err("Max power must be between 0 and 1000 kW".into());
            }
        }
        if let Some(lat) = self.position.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err("Latitude must be between -90 and 90".into());
            }
        }
        if let Some(lon) = self.position.lon {
            if !(-180.0..=180.0).contains(&lon) {
                return Err("Longitude must be between -180 and 180".into());
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for connector in &self.connectors {
            if connector.connector_id == 0 {
                return Err("Connector ids start at 1".into());
            }
            if !seen.insert(connector.connector_id) {
                return Err(format!("Duplicate connector id {}", connector.connector_id));
            }
        }

        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for ChargingStation {
    type Id = ChargingStationId;

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
        "c002"
    }

    fn resource() -> &'static str {
        "charging_station"
    }

    fn element_name() -> &'static str {
        "Charging station"
    }

    fn list_name() -> &'static str {
        "Charging stations"
    }

    fn origin() -> Origin {
        Origin::Station
    }

    fn descriptor() -> EntityDescriptor {
        super::schema::descriptor()
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a charging station
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChargingStationDto {
    pub id: Option<String>,
    pub name: String,

    #[serde(rename = "serialNumber")]
    pub serial_number: String,

    pub model: String,
    pub vendor: String,

    #[serde(default)]
    pub status: ChargingStationStatus,

    #[serde(rename = "maxPowerKw")]
    pub max_power_kw: Option<f64>,

    #[serde(rename = "commissionedAt")]
    pub commissioned_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(rename = "isPublic", default)]
    pub is_public: bool,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub connectors: Vec<Connector>,

    #[serde(rename = "locationId")]
    pub location_id: Option<LocationId>,

    #[serde(rename = "ocppConfiguration", default)]
    pub ocpp_configuration: Map<String, Value>,

    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_rejects_duplicate_connector_ids() {
        let mut station = ChargingStation::new_for_insert("CP-01".into(), "SN-1".into());
        station.connectors = vec![
            Connector {
                connector_id: 1,
                standard: "CCS2".into(),
                max_current_a: Some(200.0),
            },
            Connector {
                connector_id: 1,
                standard: "Type2".into(),
                max_current_a: None,
            },
        ];
        assert!(station.validate().is_err());

        station.connectors[1].connector_id = 2;
        assert!(station.validate().is_ok());
    }

    #[test]
    fn test_ocpp_configuration_round_trips_unmodeled_keys() {
        let mut station = ChargingStation::new_for_insert("CP-01".into(), "SN-1".into());
        station
            .ocpp_configuration
            .insert("HeartbeatInterval".into(), json!(300));

        let value = serde_json::to_value(&station).unwrap();
        assert_eq!(value["ocppConfiguration"]["HeartbeatInterval"], json!(300));

        let back: ChargingStation = serde_json::from_value(value).unwrap();
        assert_eq!(back.ocpp_configuration, station.ocpp_configuration);
    }

    #[test]
    fn test_dto_applies_to_aggregate() {
        let mut station = ChargingStation::new_for_insert("CP-01".into(), "SN-1".into());
        let dto = ChargingStationDto {
            name: "CP-01".into(),
            serial_number: "SN-1".into(),
            status: ChargingStationStatus::Available,
            max_power_kw: Some(150.0),
            ..ChargingStationDto::default()
        };

        station.update(&dto);
        assert_eq!(station.status, ChargingStationStatus::Available);
        assert_eq!(station.max_power_kw, Some(150.0));
    }
}

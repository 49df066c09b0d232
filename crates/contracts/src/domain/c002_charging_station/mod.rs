pub mod aggregate;
pub mod schema;

pub use aggregate::{
    ChargingStation, ChargingStationDto, ChargingStationId, ChargingStationStatus, Connector,
    Position,
};

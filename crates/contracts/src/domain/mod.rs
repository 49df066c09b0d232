//! Domain aggregates of the charging-station console

pub mod c001_location;
pub mod c002_charging_station;
pub mod c003_ocpp_tag;
pub mod common;

use crate::shared::metadata::SchemaRegistry;

/// Registry of every built-in editable resource
pub fn builtin_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register(c001_location::schema::descriptor());
    registry.register(c002_charging_station::schema::descriptor());
    registry.register(c003_ocpp_tag::schema::descriptor());
    registry
}

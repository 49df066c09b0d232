use super::{EntityMetadata, Origin};
use crate::shared::metadata::EntityDescriptor;

/// Trait for an aggregate root
///
/// Instance accessors plus the static class metadata the rest of the
/// system (registry, routes, store) is keyed by.
pub trait AggregateRoot {
    /// Identifier type of the aggregate
    type Id;

    fn id(&self) -> Self::Id;

    /// Display name of the record
    fn name(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system, e.g. "c001"
    fn aggregate_index() -> &'static str;

    /// Resource name records are stored and fetched under, e.g. "location"
    fn resource() -> &'static str;

    /// Singular UI name
    fn element_name() -> &'static str;

    /// Plural UI name
    fn list_name() -> &'static str;

    fn origin() -> Origin;

    /// Table-level metadata registered for this aggregate
    fn descriptor() -> EntityDescriptor;

    /// Full aggregate name, e.g. "c001_location"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::resource())
    }
}

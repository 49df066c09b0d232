//! Resource pages: thin wrappers around the generic editable table

pub mod locations;
pub mod stations;
pub mod tags;

pub use locations::LocationsPage;
pub use stations::StationsPage;
pub use tags::TagsPage;

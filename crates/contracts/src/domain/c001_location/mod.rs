pub mod aggregate;
pub mod schema;

pub use aggregate::{Location, LocationDto, LocationId};

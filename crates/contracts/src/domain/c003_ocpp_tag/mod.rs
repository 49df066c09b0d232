pub mod aggregate;
pub mod schema;

pub use aggregate::{OcppTag, OcppTagDto, OcppTagId};

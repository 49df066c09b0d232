//! Metadata types driving form and table generation
//!
//! Every editable entity registers an [`EntityDescriptor`] in the static
//! [`SchemaRegistry`]; the extractor turns a registered resource into a
//! `Vec<FieldSchema>` that any renderer can consume. There is no runtime
//! reflection: the registry is an ordinary builder table populated at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::shared::metadata::{extract, registry};
//!
//! let schema = extract::extract(registry::global(), "charging_station")?;
//! for field in &schema {
//!     println!("{}: {}", field.name, field.field_type.as_str());
//! }
//! ```

mod field_type;
mod validation;

pub mod extract;
pub mod registry;
pub mod types;

pub use field_type::FieldType;
pub use registry::{EntityDescriptor, SchemaRegistry};
pub use types::{
    AssociationDescriptor, Cardinality, CustomRender, CustomRendered, FieldSchema, SelectOption,
};
pub use validation::ValidationRules;

//! Metadata-driven form and table components
//!
//! Everything here renders the descriptor trees produced by
//! `contracts::engine`; no component knows a concrete resource.

pub mod association_picker;
pub mod editable_table;
pub mod field_renderer;
pub mod generic_form;

pub use association_picker::{AssociationPickerModal, PickerRequest};
pub use editable_table::EditableTable;
pub use field_renderer::{render_node, FormHandle};
pub use generic_form::GenericForm;

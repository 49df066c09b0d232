//! Metadata-driven form/table engine core
//!
//! Pure, platform-neutral logic: schema resolution into render descriptors,
//! path addressing, disclosure/unknown state, the editable-table state
//! machine, validation and save-payload construction. The Leptos layer in the
//! frontend crate only walks the structures produced here.

pub mod association;
pub mod field_path;
pub mod flags;
pub mod payload;
pub mod provider;
pub mod reconcile;
pub mod renderer;
pub mod table;
pub mod unknowns;
pub mod validate;
pub mod value_path;

pub use association::{hydrate_record, AssociationPlan, FormSessionId, SelectionCache};
pub use field_path::{FieldPath, PathKey, PathSegment};
pub use flags::Flags;
pub use payload::NEW_RECORD_ID;
pub use provider::{
    DataProvider, ListParams, ListResult, NotificationService, Pagination, ProviderError, Sort,
};
pub use renderer::{resolve, resolve_form, EditorKind, FormState, RenderNode, UnknownRow};
pub use table::{
    dispatch_save, EditOutcome, EditableTableController, SaveAction, TableMode, TableSetupError,
};
pub use unknowns::{UnknownEntry, UnknownType, Unknowns};
pub use validate::ValidationError;

//! Editable-table state machine
//!
//! One controller instance orchestrates a list view: a tagged-union mode
//! makes illegal state combinations unrepresentable, and `save()` returns a
//! [`SaveAction`] instead of performing I/O, so the whole machine is testable
//! without a transport. The hosting component dispatches the action through
//! the [`DataProvider`](super::provider::DataProvider) and reports back via
//! `save_succeeded` / `save_failed`.

use std::fmt;

use serde_json::Value;

use super::association::FormSessionId;
use super::payload::{self, NEW_RECORD_ID};
use super::provider::{DataProvider, ProviderError};
use super::renderer::FormState;
use super::validate::{validate_record, ValidationError};
use crate::shared::metadata::{EntityDescriptor, FieldSchema};

/// Mode of one table instance
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableMode {
    #[default]
    Viewing,
    /// Editing a local placeholder row that does not exist on the server yet
    Creating,
    /// Editing an existing record; carries the last committed values
    Editing(Value),
    /// A mutation is in flight; the submit affordance is disabled
    Saving,
}

/// Decision produced by `save()`; the caller performs the matching I/O
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    /// Validation failed: stay in editing, show inline errors, no network call
    RejectedInvalid(Vec<ValidationError>),
    /// Create with the sentinel primary key stripped
    Create { values: Value },
    /// Update with association fields normalized to primary-key sets
    Update { id: Value, values: Value },
}

/// Result of requesting an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Started,
    /// The form is dirty; the user must confirm discarding before `force_edit`
    NeedsConfirmation,
    /// A save is in flight; the request is dropped
    Ignored,
}

/// Missing table-level metadata; the whole table is disabled rather than
/// partially rendered with undefined behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSetupError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for TableSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table disabled, missing: {}", self.missing.join(", "))
    }
}

impl std::error::Error for TableSetupError {}

#[derive(Debug, Clone)]
pub struct EditableTableController {
    descriptor: EntityDescriptor,
    schema: Vec<FieldSchema>,
    pub mode: TableMode,
    pub rows: Vec<Value>,
    pub form: FormState,
    pub errors: Vec<ValidationError>,
    committed: Value,
    session: FormSessionId,
}

impl EditableTableController {
    pub fn new(
        descriptor: EntityDescriptor,
        schema: Vec<FieldSchema>,
    ) -> Result<Self, TableSetupError> {
        let mut missing = Vec::new();
        if descriptor.resource.is_empty() {
            missing.push("resource");
        }
        if descriptor.primary_key.is_empty() {
            missing.push("primaryKey");
        }
        if descriptor.list_query.is_none() {
            missing.push("listQuery");
        }
        if descriptor.create_mutation.is_none() {
            missing.push("createMutation");
        }
        if !missing.is_empty() {
            return Err(TableSetupError { missing });
        }

        Ok(Self {
            descriptor,
            schema,
            mode: TableMode::Viewing,
            rows: Vec::new(),
            form: FormState::new(),
            errors: Vec::new(),
            committed: Value::Null,
            session: FormSessionId::new(),
        })
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub fn schema(&self) -> &[FieldSchema] {
        &self.schema
    }

    pub fn session(&self) -> FormSessionId {
        self.session
    }

    pub fn set_rows(&mut self, rows: Vec<Value>) {
        self.rows = rows;
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.mode, TableMode::Creating | TableMode::Editing(_))
            && self.form.record != self.committed
    }

    pub fn is_saving(&self) -> bool {
        self.mode == TableMode::Saving
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, TableMode::Creating | TableMode::Editing(_))
    }

    /// Insert a placeholder row with the sentinel primary key and start editing it
    pub fn begin_create(&mut self) -> EditOutcome {
        match self.mode {
            TableMode::Saving => return EditOutcome::Ignored,
            _ if self.is_dirty() => return EditOutcome::NeedsConfirmation,
            _ => {}
        }

        let mut placeholder = (self.descriptor.empty_record)();
        if let Some(map) = placeholder.as_object_mut() {
            map.insert(
                self.descriptor.primary_key.clone(),
                Value::String(NEW_RECORD_ID.to_string()),
            );
        }
        self.remove_placeholder_row();
        self.rows.push(placeholder.clone());
        self.committed = placeholder.clone();
        self.form.reset(placeholder);
        self.errors.clear();
        self.mode = TableMode::Creating;
        EditOutcome::Started
    }

    /// Start editing an existing record; a dirty form requires explicit
    /// confirmation (`force_edit`) before its edits are discarded
    pub fn begin_edit(&mut self, record: &Value) -> EditOutcome {
        match self.mode {
            TableMode::Saving => EditOutcome::Ignored,
            _ if self.is_dirty() => EditOutcome::NeedsConfirmation,
            _ => {
                self.force_edit(record);
                EditOutcome::Started
            }
        }
    }

    /// Discard whatever is being edited and start editing `record`
    pub fn force_edit(&mut self, record: &Value) {
        self.remove_placeholder_row();
        self.committed = record.clone();
        self.form.reset(record.clone());
        self.errors.clear();
        self.mode = TableMode::Editing(record.clone());
    }

    /// Validate and decide the mutation; transitions to `Saving` when valid
    pub fn save(&mut self) -> Option<SaveAction> {
        if !self.is_editing() {
            return None;
        }

        let errors = validate_record(&self.schema, &self.form.record);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Some(SaveAction::RejectedInvalid(errors));
        }
        self.errors.clear();

        let primary_key = self.descriptor.primary_key.clone();
        let action = if payload::is_placeholder(&self.form.record, &primary_key) {
            let mut values = payload::normalize_associations(&self.schema, &self.form.record);
            payload::strip_sentinel(&mut values, &primary_key);
            SaveAction::Create { values }
        } else {
            let values = payload::normalize_associations(&self.schema, &self.form.record);
            let id = self
                .form
                .record
                .get(&primary_key)
                .cloned()
                .unwrap_or(Value::Null);
            SaveAction::Update { id, values }
        };

        self.mode = TableMode::Saving;
        Some(action)
    }

    /// The mutation succeeded: clear editing state and drop the placeholder.
    /// The caller must trigger exactly one refetch of the table's data.
    pub fn save_succeeded(&mut self) {
        self.remove_placeholder_row();
        self.committed = Value::Null;
        self.form.reset(Value::Null);
        self.errors.clear();
        self.mode = TableMode::Viewing;
    }

    /// The mutation failed: return to editing with all edits retained so the
    /// user may retry or cancel
    pub fn save_failed(&mut self) {
        if self.mode != TableMode::Saving {
            return;
        }
        self.mode = if payload::is_placeholder(&self.form.record, &self.descriptor.primary_key) {
            TableMode::Creating
        } else {
            TableMode::Editing(self.committed.clone())
        };
    }

    /// Leave editing: a placeholder is removed, a real record's form is reset
    /// to the last committed values
    pub fn cancel(&mut self) {
        match &self.mode {
            TableMode::Creating => {
                self.remove_placeholder_row();
            }
            TableMode::Editing(_) => {
                self.form.reset(self.committed.clone());
            }
            _ => return,
        }
        self.committed = Value::Null;
        self.errors.clear();
        self.mode = TableMode::Viewing;
    }

    fn remove_placeholder_row(&mut self) {
        let primary_key = &self.descriptor.primary_key;
        self.rows
            .retain(|row| !payload::is_placeholder(row, primary_key));
    }
}

/// Perform a decided save action against the data-access collaborator
pub async fn dispatch_save(
    provider: &dyn DataProvider,
    descriptor: &EntityDescriptor,
    action: &SaveAction,
) -> Result<Value, ProviderError> {
    match action {
        SaveAction::RejectedInvalid(_) => Err(ProviderError::new(
            "rejected values must not reach the data provider",
        )),
        SaveAction::Create { values } => {
            provider
                .create(
                    &descriptor.resource,
                    values,
                    descriptor.create_mutation.as_deref(),
                )
                .await
        }
        SaveAction::Update { id, values } => {
            provider
                .update(
                    &descriptor.resource,
                    id,
                    values,
                    descriptor.update_mutation.as_deref(),
                )
                .await
        }
    }
}

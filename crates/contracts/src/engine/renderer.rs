//! Recursive schema resolver
//!
//! `resolve(schema, path, state)` turns one field schema into a render
//! descriptor tree. The descriptor is pure data: the Leptos layer walks it
//! and emits views, feeding edits back into the [`FormState`] through the
//! binding paths the descriptors carry.

use std::collections::HashMap;

use serde_json::Value;

use super::association::{self, AssociationPlan};
use super::field_path::{FieldPath, PathKey};
use super::flags::Flags;
use super::unknowns::{UnknownEntry, UnknownType, Unknowns};
use super::value_path;
use crate::shared::metadata::{Cardinality, CustomRendered, FieldSchema, FieldType, SelectOption};

/// Stable identities for array items, so the key path of an item survives
/// insertion and removal of its siblings
#[derive(Debug, Clone, Default)]
pub struct ArrayIdentity {
    ids: HashMap<PathKey, Vec<u64>>,
    next: u64,
}

impl ArrayIdentity {
    /// Identities for the array at `path`, grown with fresh ids to `len`
    pub fn ids_for(&mut self, path: &FieldPath, len: usize) -> Vec<u64> {
        let slot = self.ids.entry(path.key_owned()).or_default();
        while slot.len() < len {
            slot.push(self.next);
            self.next += 1;
        }
        slot.truncate(len);
        slot.clone()
    }

    pub fn insert(&mut self, path: &FieldPath, index: usize) {
        let slot = self.ids.entry(path.key_owned()).or_default();
        let index = index.min(slot.len());
        slot.insert(index, self.next);
        self.next += 1;
    }

    pub fn remove(&mut self, path: &FieldPath, index: usize) {
        if let Some(slot) = self.ids.get_mut(path.key()) {
            if index < slot.len() {
                slot.remove(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Per-session state of one form instance
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub record: Value,
    pub flags: Flags,
    pub unknowns: Unknowns,
    pub array_ids: ArrayIdentity,
    /// Read-only rendering: associations degrade to value summaries
    pub disabled: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: Value) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    /// Replace the record and drop all session state tied to the old one
    pub fn reset(&mut self, record: Value) {
        self.record = record;
        self.flags.clear();
        self.unknowns.clear();
        self.array_ids.clear();
    }

    pub fn value_at(&self, path: &FieldPath) -> Option<&Value> {
        value_path::get(&self.record, path.name_path())
    }

    pub fn set_value(&mut self, path: &FieldPath, value: Value) {
        value_path::set(&mut self.record, path.name_path(), value);
    }

    /// Append an item to the array at `path` with a fresh stable identity
    pub fn push_array_item(&mut self, path: &FieldPath, item: Value) {
        let len = self
            .value_at(path)
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        let item_path = path.item(0, len);
        value_path::set(&mut self.record, item_path.name_path(), item);
        self.array_ids.insert(path, len);
    }

    /// Remove the item at `index`, keeping the siblings' identities intact
    pub fn remove_array_item(&mut self, path: &FieldPath, index: usize) {
        let item_path = path.item(0, index);
        value_path::remove(&mut self.record, item_path.name_path());
        self.array_ids.remove(path, index);
    }
}

/// Concrete editor control of a primitive field
#[derive(Debug, Clone, PartialEq)]
pub enum EditorKind {
    Text,
    Number,
    Checkbox,
    DateTime,
    Select(Vec<SelectOption>),
}

/// One row of an unknown-properties list
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownRow {
    pub index: usize,
    pub entry: UnknownEntry,
    /// Bound value editor, present once the row has a name and a chosen type
    pub value_editor: Option<Box<RenderNode>>,
}

/// Resolved render descriptor of one schema node
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    /// Bound editor at the path's value address
    Editor {
        path: FieldPath,
        label: String,
        kind: EditorKind,
        required: bool,
        value: Value,
    },
    /// Affordance that discloses an optional field on activation
    Disclosure { path: FieldPath, label: String },
    /// Plain nested object
    Group {
        path: FieldPath,
        label: String,
        children: Vec<RenderNode>,
    },
    /// Repeatable list of nested items; each item is a `Group`
    ArrayList {
        path: FieldPath,
        label: String,
        items: Vec<RenderNode>,
    },
    /// Association field: summary plus (when editable) a candidate picker
    Association {
        path: FieldPath,
        label: String,
        plan: AssociationPlan,
        summary: String,
        editable: bool,
    },
    /// Single dynamically-typed slot: a value editor appears only after a type is chosen
    UnknownSlot {
        path: FieldPath,
        label: String,
        entry: Option<UnknownEntry>,
        value_editor: Option<Box<RenderNode>>,
    },
    /// Ordered list of `{name, type, value}` rows
    UnknownList {
        path: FieldPath,
        label: String,
        rows: Vec<UnknownRow>,
        can_add: bool,
    },
    /// Verbatim output of a custom render override
    Custom { path: FieldPath, output: CustomRendered },
    /// Inline, non-fatal resolution error (e.g. incomplete association metadata)
    Error { path: FieldPath, message: String },
}

/// Resolve one field at `path` against the current form state
pub fn resolve(field: &FieldSchema, path: &FieldPath, state: &mut FormState) -> RenderNode {
    if let Some(custom) = &field.custom_render {
        let parent = parent_record(state, path);
        return RenderNode::Custom {
            path: path.clone(),
            output: custom.render(&parent),
        };
    }

    if let Some(descriptor) = &field.association {
        return resolve_association(field, descriptor, path, state);
    }

    match field.field_type {
        kind if kind.is_primitive() => resolve_primitive(field, path, state),
        FieldType::NestedObject => {
            let children = field
                .nested_fields
                .iter()
                .map(|nested| resolve(nested, &path.child(&nested.name), state))
                .collect();
            RenderNode::Group {
                path: path.clone(),
                label: field.label.clone(),
                children,
            }
        }
        FieldType::Array => resolve_array(field, path, state),
        FieldType::Unknown => resolve_unknown_slot(field, path, state),
        FieldType::UnknownProperty => resolve_unknown_list(field, path, state, false),
        FieldType::UnknownProperties => resolve_unknown_list(field, path, state, true),
        _ => RenderNode::Error {
            path: path.clone(),
            message: format!(
                "field '{}' has unresolvable type '{}'",
                field.name,
                field.field_type.as_str()
            ),
        },
    }
}

/// Resolve a whole schema as the root form
pub fn resolve_form(fields: &[FieldSchema], state: &mut FormState) -> Vec<RenderNode> {
    let root = FieldPath::root();
    fields
        .iter()
        .map(|field| resolve(field, &root.child(&field.name), state))
        .collect()
}

fn resolve_primitive(field: &FieldSchema, path: &FieldPath, state: &mut FormState) -> RenderNode {
    let required = field.is_required;
    if !required && !state.flags.is_enabled(path) {
        return RenderNode::Disclosure {
            path: path.clone(),
            label: field.label.clone(),
        };
    }
    RenderNode::Editor {
        path: path.clone(),
        label: field.label.clone(),
        kind: editor_kind(field),
        required,
        value: state.value_at(path).cloned().unwrap_or(Value::Null),
    }
}

fn editor_kind(field: &FieldSchema) -> EditorKind {
    match field.field_type {
        FieldType::Select => EditorKind::Select(field.options.clone()),
        FieldType::Number => EditorKind::Number,
        FieldType::Boolean => EditorKind::Checkbox,
        FieldType::DateTime => EditorKind::DateTime,
        _ => EditorKind::Text,
    }
}

fn resolve_array(field: &FieldSchema, path: &FieldPath, state: &mut FormState) -> RenderNode {
    let len = state
        .value_at(path)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    let ids = state.array_ids.ids_for(path, len);

    let mut items = Vec::with_capacity(len);
    for (index, stable_id) in ids.into_iter().enumerate() {
        let item_path = path.item(stable_id, index);
        let children = field
            .nested_fields
            .iter()
            .map(|nested| resolve(nested, &item_path.child(&nested.name), state))
            .collect();
        items.push(RenderNode::Group {
            path: item_path,
            label: format!("{} {}", field.label, index + 1),
            children,
        });
    }

    RenderNode::ArrayList {
        path: path.clone(),
        label: field.label.clone(),
        items,
    }
}

fn resolve_association(
    field: &FieldSchema,
    descriptor: &crate::shared::metadata::AssociationDescriptor,
    path: &FieldPath,
    state: &mut FormState,
) -> RenderNode {
    let parent = parent_record(state, path);
    let plan = match association::plan(descriptor, &parent) {
        Ok(plan) => plan,
        Err(missing) => {
            return RenderNode::Error {
                path: path.clone(),
                message: format!(
                    "association '{}' is missing: {}",
                    field.name,
                    missing.join(", ")
                ),
            };
        }
    };

    let summary = association::summarize(state.value_at(path), descriptor);
    let editable = !state.disabled;
    // An array field always picks with multiple cardinality
    let plan = if field.field_type == FieldType::Array {
        AssociationPlan {
            cardinality: Cardinality::Multiple,
            ..plan
        }
    } else {
        plan
    };

    RenderNode::Association {
        path: path.clone(),
        label: field.label.clone(),
        plan,
        summary,
        editable,
    }
}

fn resolve_unknown_slot(field: &FieldSchema, path: &FieldPath, state: &mut FormState) -> RenderNode {
    let entry = state.unknowns.entries(path).first().cloned();
    let value_editor = entry.as_ref().and_then(|entry| {
        entry.entry_type.map(|entry_type| {
            Box::new(RenderNode::Editor {
                path: path.clone(),
                label: field.label.clone(),
                kind: unknown_editor_kind(entry_type),
                required: false,
                value: state.value_at(path).cloned().unwrap_or(Value::Null),
            })
        })
    });

    RenderNode::UnknownSlot {
        path: path.clone(),
        label: field.label.clone(),
        entry,
        value_editor,
    }
}

fn resolve_unknown_list(
    field: &FieldSchema,
    path: &FieldPath,
    state: &mut FormState,
    can_add: bool,
) -> RenderNode {
    // Unknown-property values live on the object that hosts the field,
    // keyed by each entry's chosen name
    let host = path.pop();
    let entries: Vec<UnknownEntry> = state.unknowns.entries(path).to_vec();

    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let value_editor = match (&entry.name, entry.entry_type) {
                (Some(name), Some(entry_type)) if !name.is_empty() => {
                    let value_path = host.child(name);
                    Some(Box::new(RenderNode::Editor {
                        path: value_path.clone(),
                        label: name.clone(),
                        kind: unknown_editor_kind(entry_type),
                        required: false,
                        value: state.value_at(&value_path).cloned().unwrap_or(Value::Null),
                    }))
                }
                _ => None,
            };
            UnknownRow {
                index,
                entry,
                value_editor,
            }
        })
        .collect();

    RenderNode::UnknownList {
        path: path.clone(),
        label: field.label.clone(),
        rows,
        can_add,
    }
}

fn unknown_editor_kind(entry_type: UnknownType) -> EditorKind {
    match entry_type {
        UnknownType::String => EditorKind::Text,
        UnknownType::Number => EditorKind::Number,
        UnknownType::Boolean => EditorKind::Checkbox,
        UnknownType::DateTime => EditorKind::DateTime,
    }
}

fn parent_record(state: &FormState, path: &FieldPath) -> Value {
    let parent = path.pop();
    if parent.is_root() {
        state.record.clone()
    } else {
        state.value_at(&parent).cloned().unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{
        AssociationDescriptor, CustomRender, ValidationRules,
    };
    use serde_json::json;

    fn input(name: &str, label: &str) -> FieldSchema {
        FieldSchema::new(name, label, FieldType::Input)
    }

    fn required_input(name: &str, label: &str) -> FieldSchema {
        let mut field = input(name, label).with_validation(ValidationRules::required());
        field.is_required = true;
        field
    }

    #[test]
    fn test_required_primitive_resolves_to_editor() {
        let field = required_input("serial", "Serial number");
        let mut state = FormState::with_record(json!({"serial": "A-1"}));
        let node = resolve(&field, &FieldPath::root().child("serial"), &mut state);

        match node {
            RenderNode::Editor { kind, required, value, .. } => {
                assert_eq!(kind, EditorKind::Text);
                assert!(required);
                assert_eq!(value, json!("A-1"));
            }
            other => panic!("expected editor, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_primitive_discloses_on_flag() {
        let field = input("comment", "Comment");
        let path = FieldPath::root().child("comment");
        let mut state = FormState::new();

        assert!(matches!(
            resolve(&field, &path, &mut state),
            RenderNode::Disclosure { .. }
        ));

        state.flags.enable(&path);
        assert!(matches!(
            resolve(&field, &path, &mut state),
            RenderNode::Editor { .. }
        ));
    }

    #[test]
    fn test_array_items_keep_stable_keys_across_removal() {
        let field = FieldSchema::new("connectors", "Connectors", FieldType::Array)
            .with_nested(vec![input("standard", "Standard")]);
        let path = FieldPath::root().child("connectors");
        let mut state = FormState::with_record(
            json!({"connectors": [{"standard": "CCS"}, {"standard": "CHAdeMO"}, {"standard": "Type2"}]}),
        );

        let before = resolve(&field, &path, &mut state);
        let key_of = |node: &RenderNode, index: usize| match node {
            RenderNode::ArrayList { items, .. } => match &items[index] {
                RenderNode::Group { path, .. } => path.key_owned(),
                other => panic!("expected group, got {:?}", other),
            },
            other => panic!("expected array list, got {:?}", other),
        };
        let last_key = key_of(&before, 2);

        // Removing the middle item must not scramble the last item's identity
        state.remove_array_item(&path, 1);
        let after = resolve(&field, &path, &mut state);
        match &after {
            RenderNode::ArrayList { items, .. } => assert_eq!(items.len(), 2),
            other => panic!("expected array list, got {:?}", other),
        }
        assert_eq!(key_of(&after, 1), last_key);
    }

    #[test]
    fn test_association_resolves_with_plan_and_summary() {
        let field = FieldSchema::new("location", "Location", FieldType::NestedObject)
            .with_association(
                AssociationDescriptor::new("location", "locationId", "id", Cardinality::Single)
                    .with_queries("locationOne", "locationList"),
            );
        let mut state =
            FormState::with_record(json!({"location": {"id": 7, "name": "Depot Nord"}}));
        let node = resolve(&field, &FieldPath::root().child("location"), &mut state);

        match node {
            RenderNode::Association { plan, summary, editable, .. } => {
                assert_eq!(plan.resource, "location");
                assert_eq!(plan.cardinality, Cardinality::Single);
                assert_eq!(summary, "Depot Nord");
                assert!(editable);
            }
            other => panic!("expected association, got {:?}", other),
        }
    }

    #[test]
    fn test_array_association_picks_with_multiple_cardinality() {
        let field = FieldSchema::new("stations", "Stations", FieldType::Array).with_association(
            AssociationDescriptor::new("charging_station", "stationIds", "id", Cardinality::Single)
                .with_queries("stationOne", "stationList"),
        );
        let mut state = FormState::new();
        let node = resolve(&field, &FieldPath::root().child("stations"), &mut state);
        match node {
            RenderNode::Association { plan, .. } => {
                assert_eq!(plan.cardinality, Cardinality::Multiple)
            }
            other => panic!("expected association, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_association_is_read_only() {
        let field = FieldSchema::new("location", "Location", FieldType::NestedObject)
            .with_association(
                AssociationDescriptor::new("location", "locationId", "id", Cardinality::Single)
                    .with_queries("locationOne", "locationList"),
            );
        let mut state = FormState::new();
        state.disabled = true;
        let node = resolve(&field, &FieldPath::root().child("location"), &mut state);
        match node {
            RenderNode::Association { editable, .. } => assert!(!editable),
            other => panic!("expected association, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_association_renders_inline_error() {
        let field = FieldSchema::new("location", "Location", FieldType::NestedObject)
            .with_association(AssociationDescriptor::new(
                "location",
                "locationId",
                "id",
                Cardinality::Single,
            ));
        let mut state = FormState::new();
        let node = resolve(&field, &FieldPath::root().child("location"), &mut state);
        match node {
            RenderNode::Error { message, .. } => {
                assert!(message.contains("listQuery"), "{}", message)
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_slot_requires_type_before_value_editor() {
        let field = FieldSchema::new("extra", "Extra", FieldType::Unknown);
        let path = FieldPath::root().child("extra");
        let mut state = FormState::new();

        state.unknowns.register_last(&path);
        let node = resolve(&field, &path, &mut state);
        match &node {
            RenderNode::UnknownSlot { value_editor, .. } => assert!(value_editor.is_none()),
            other => panic!("expected unknown slot, got {:?}", other),
        }

        state.unknowns.update(
            &path,
            0,
            UnknownEntry {
                name: None,
                entry_type: Some(UnknownType::Number),
            },
        );
        let node = resolve(&field, &path, &mut state);
        match node {
            RenderNode::UnknownSlot { value_editor, .. } => match value_editor.as_deref() {
                Some(RenderNode::Editor { kind, .. }) => assert_eq!(*kind, EditorKind::Number),
                other => panic!("expected editor, got {:?}", other),
            },
            other => panic!("expected unknown slot, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_list_binds_values_on_host_object() {
        let field = FieldSchema::new("vendor_config", "Vendor configuration", FieldType::UnknownProperties);
        let path = FieldPath::root().child("vendor_config");
        let mut state = FormState::with_record(json!({"HeartbeatInterval": 300}));
        state.unknowns.override_entries(
            &path,
            vec![UnknownEntry::named("HeartbeatInterval", UnknownType::Number)],
        );

        let node = resolve(&field, &path, &mut state);
        match node {
            RenderNode::UnknownList { rows, can_add, .. } => {
                assert!(can_add);
                assert_eq!(rows.len(), 1);
                match rows[0].value_editor.as_deref() {
                    Some(RenderNode::Editor { path, value, .. }) => {
                        assert_eq!(
                            path.name_path(),
                            FieldPath::root().child("HeartbeatInterval").name_path()
                        );
                        assert_eq!(*value, json!(300));
                    }
                    other => panic!("expected editor, got {:?}", other),
                }
            }
            other => panic!("expected unknown list, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_render_receives_parent_record() {
        let field = FieldSchema::new("badge", "Badge", FieldType::CustomRender).with_custom_render(
            CustomRender::new(|record| {
                CustomRendered::text(format!(
                    "status: {}",
                    record.get("status").and_then(Value::as_str).unwrap_or("?")
                ))
            }),
        );
        let mut state = FormState::with_record(json!({"status": "Charging"}));
        let node = resolve(&field, &FieldPath::root().child("badge"), &mut state);
        match node {
            RenderNode::Custom { output, .. } => assert_eq!(output.text, "status: Charging"),
            other => panic!("expected custom output, got {:?}", other),
        }
    }
}

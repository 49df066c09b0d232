//! Dynamically-declared, schema-unaware property entries
//!
//! An [`Unknowns`] store holds, per schema node, the ordered list of extra
//! properties the UI is currently rendering. It is created empty per
//! form/table session, populated interactively or by reconciliation against
//! loaded data, and never persisted directly; the values themselves live in
//! the record and round-trip into the saved payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::field_path::{FieldPath, PathKey};

/// Value type of an unknown property; must be chosen before its
/// value editor can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownType {
    String,
    Number,
    Boolean,
    DateTime,
}

impl UnknownType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
        }
    }

    pub fn all() -> &'static [UnknownType] {
        &[Self::String, Self::Number, Self::Boolean, Self::DateTime]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "datetime" => Some(Self::DateTime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnknownEntry {
    pub name: Option<String>,
    pub entry_type: Option<UnknownType>,
}

impl UnknownEntry {
    pub fn named(name: impl Into<String>, entry_type: UnknownType) -> Self {
        Self {
            name: Some(name.into()),
            entry_type: Some(entry_type),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Unknowns {
    entries: HashMap<PathKey, Vec<UnknownEntry>>,
}

impl Unknowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blank entry at the head of the node's list
    pub fn register_first(&mut self, path: &FieldPath) {
        self.entries
            .entry(path.key_owned())
            .or_default()
            .insert(0, UnknownEntry::default());
    }

    /// Append a blank entry at the tail of the node's list
    pub fn register_last(&mut self, path: &FieldPath) {
        self.entries
            .entry(path.key_owned())
            .or_default()
            .push(UnknownEntry::default());
    }

    pub fn update(&mut self, path: &FieldPath, index: usize, entry: UnknownEntry) {
        if let Some(list) = self.entries.get_mut(path.key()) {
            if let Some(slot) = list.get_mut(index) {
                *slot = entry;
            }
        }
    }

    pub fn remove(&mut self, path: &FieldPath, index: usize) {
        if let Some(list) = self.entries.get_mut(path.key()) {
            if index < list.len() {
                list.remove(index);
            }
            if list.is_empty() {
                self.entries.remove(path.key());
            }
        }
    }

    /// Replace the node's whole list (reconciliation against loaded data)
    pub fn override_entries(&mut self, path: &FieldPath, entries: Vec<UnknownEntry>) {
        if entries.is_empty() {
            self.entries.remove(path.key());
        } else {
            self.entries.insert(path.key_owned(), entries);
        }
    }

    pub fn entries(&self, path: &FieldPath) -> &[UnknownEntry] {
        self.entries.get(path.key()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

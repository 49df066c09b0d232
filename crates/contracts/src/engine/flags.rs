//! Disclosure state for optional fields
//!
//! Created per form session and destroyed with the form. A flag keyed by a
//! field's stable key path records that the user has disclosed an optional
//! field; undisclosed optional primitives render as a disclosure affordance
//! instead of an editor.

use std::collections::HashMap;

use super::field_path::{FieldPath, PathKey};

#[derive(Debug, Clone, Default)]
pub struct Flags {
    entries: HashMap<PathKey, bool>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, path: &FieldPath) {
        self.entries.insert(path.key_owned(), true);
    }

    pub fn disable(&mut self, path: &FieldPath) {
        self.entries.insert(path.key_owned(), false);
    }

    pub fn is_enabled(&self, path: &FieldPath) -> bool {
        self.entries.get(path.key()).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_disable() {
        let mut flags = Flags::new();
        let path = FieldPath::root().child("comment");

        assert!(!flags.is_enabled(&path));
        flags.enable(&path);
        assert!(flags.is_enabled(&path));
        flags.disable(&path);
        assert!(!flags.is_enabled(&path));
    }

    #[test]
    fn test_paths_are_independent() {
        let mut flags = Flags::new();
        let a = FieldPath::root().child("connectors").item(1, 0).child("note");
        let b = FieldPath::root().child("connectors").item(2, 1).child("note");

        flags.enable(&a);
        assert!(flags.is_enabled(&a));
        assert!(!flags.is_enabled(&b));
    }
}

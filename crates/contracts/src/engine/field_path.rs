//! Dual addressing of schema nodes
//!
//! A [`FieldPath`] carries two parallel addresses for one node:
//! - `key_path`: stable UI identity; array items contribute an
//!   index-independent [`PathSegment::Item`] so insertion/removal does not
//!   scramble unrelated items' state;
//! - `name_path`: address into the actual value tree, used for binding;
//!   array items contribute the positional [`PathSegment::Index`].

/// One step of a path: a typed value usable directly as a structural map key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object property name
    Key(String),
    /// Positional slot inside an array value
    Index(usize),
    /// Stable, index-independent identity of an array item
    Item(u64),
}

impl PathSegment {
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

/// A key path usable as a map key for session state (flags, unknowns, caches)
pub type PathKey = Vec<PathSegment>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    key_path: Vec<PathSegment>,
    name_path: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend both addresses with the same segment
    pub fn with(&self, segment: PathSegment) -> Self {
        let mut next = self.clone();
        next.key_path.push(segment.clone());
        next.name_path.push(segment);
        next
    }

    /// Descend into a named property
    pub fn child(&self, name: &str) -> Self {
        self.with(PathSegment::key(name))
    }

    /// Descend into an array item: the key path gets the item's stable
    /// identity, the name path its current positional slot
    pub fn item(&self, stable_id: u64, index: usize) -> Self {
        let mut next = self.clone();
        next.key_path.push(PathSegment::Item(stable_id));
        next.name_path.push(PathSegment::Index(index));
        next
    }

    /// Remove the last segment of both addresses
    ///
    /// For any segment `s`, `path.with(s).pop() == path`.
    pub fn pop(&self) -> Self {
        let mut prev = self.clone();
        prev.key_path.pop();
        prev.name_path.pop();
        prev
    }

    pub fn is_root(&self) -> bool {
        self.key_path.is_empty()
    }

    /// Stable UI-identity address
    pub fn key(&self) -> &[PathSegment] {
        &self.key_path
    }

    /// Value-tree address
    pub fn name_path(&self) -> &[PathSegment] {
        &self.name_path
    }

    pub fn key_owned(&self) -> PathKey {
        self.key_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_then_pop_restores_path() {
        let path = FieldPath::root().child("connectors").item(7, 2);
        for segment in [
            PathSegment::key("standard"),
            PathSegment::Index(0),
            PathSegment::Item(42),
        ] {
            assert_eq!(path.with(segment).pop(), path);
        }
    }

    #[test]
    fn test_item_separates_key_and_name_paths() {
        let path = FieldPath::root().child("connectors").item(9, 0);
        assert_eq!(
            path.key(),
            &[PathSegment::key("connectors"), PathSegment::Item(9)]
        );
        assert_eq!(
            path.name_path(),
            &[PathSegment::key("connectors"), PathSegment::Index(0)]
        );
    }

    #[test]
    fn test_item_key_survives_reindexing() {
        let base = FieldPath::root().child("connectors");
        // Same item moved from slot 2 to slot 1 keeps its key path
        let before = base.item(7, 2);
        let after = base.item(7, 1);
        assert_eq!(before.key(), after.key());
        assert_ne!(before.name_path(), after.name_path());
    }

    #[test]
    fn test_pop_on_root_stays_root() {
        assert!(FieldPath::root().pop().is_root());
    }
}

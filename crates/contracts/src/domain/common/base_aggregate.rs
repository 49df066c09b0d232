use serde::{Deserialize, Serialize};

use super::EntityMetadata;

/// Base aggregate with the fields every aggregate carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    /// Unique record identifier
    pub id: Id,
    /// Display name of the record
    pub name: String,
    /// Free-form comment
    pub comment: Option<String>,
    /// Lifecycle metadata
    #[serde(default)]
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, name: String) -> Self {
        Self {
            id,
            name,
            comment: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Rebuild an aggregate loaded from the store
    pub fn with_metadata(
        id: Id,
        name: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            name,
            comment,
            metadata,
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}

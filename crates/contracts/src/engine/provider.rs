//! External collaborator seams
//!
//! The engine never talks to a transport directly: all reads and mutations go
//! through [`DataProvider`], and all user-facing surfaces of the table state
//! machine go through [`NotificationService`]. Futures are `?Send` because
//! the frontend implementation runs on a single-threaded wasm executor.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub ascending: bool,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Parameters of a list lookup
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub pagination: Option<Pagination>,
    pub sort: Option<Sort>,
    /// Field-equality filters
    pub filters: Option<Value>,
    /// Free-text candidate search
    pub search: Option<String>,
    /// Per-record query variables from an association descriptor
    pub variables: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ListResult {
    pub items: Vec<Value>,
    pub total_count: usize,
}

/// A failed round-trip to the data-access collaborator; the raw server
/// message is preserved for the blocking error surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<anyhow::Error> for ProviderError {
    fn from(e: anyhow::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Schema-independent data access
#[async_trait(?Send)]
pub trait DataProvider {
    async fn list(
        &self,
        resource: &str,
        query: Option<&str>,
        params: &ListParams,
    ) -> Result<ListResult, ProviderError>;

    async fn get_one(
        &self,
        resource: &str,
        id: &Value,
        query: Option<&str>,
    ) -> Result<Value, ProviderError>;

    async fn create(
        &self,
        resource: &str,
        values: &Value,
        mutation: Option<&str>,
    ) -> Result<Value, ProviderError>;

    async fn update(
        &self,
        resource: &str,
        id: &Value,
        values: &Value,
        mutation: Option<&str>,
    ) -> Result<Value, ProviderError>;
}

/// Success/error/confirmation surfaces used by the table state machine
pub trait NotificationService {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    /// Blocking yes/no confirmation, e.g. before discarding a dirty form
    fn confirm(&self, message: &str) -> bool;
}

//! Core schema types consumed by the form/table engine

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::field_type::FieldType;
use super::validation::ValidationRules;

/// One choice of a `Select` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How many associated records a field may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Single,
    Multiple,
}

/// Per-record query-variable provider for association list queries
pub type QueryVariablesFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A query-resolved reference to another resource's record(s)
///
/// Ownership is a query-time lookup keyed by id fields, not an in-memory
/// pointer: `parent_id_field_name` is the key written into the parent's save
/// payload, `associated_id_field_name` is the primary-key field on candidate
/// records.
#[derive(Clone)]
pub struct AssociationDescriptor {
    /// Resource the candidates are fetched from
    pub associated_resource: String,
    /// Field name on the parent payload, e.g. `locationId`
    pub parent_id_field_name: String,
    /// Primary-key field on the associated records, e.g. `id`
    pub associated_id_field_name: String,
    pub get_one_query: Option<String>,
    pub list_query: Option<String>,
    /// Optional per-record parameterization of the list query
    pub query_variables: Option<QueryVariablesFn>,
    pub cardinality: Cardinality,
}

impl AssociationDescriptor {
    pub fn new(
        associated_resource: impl Into<String>,
        parent_id_field_name: impl Into<String>,
        associated_id_field_name: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            associated_resource: associated_resource.into(),
            parent_id_field_name: parent_id_field_name.into(),
            associated_id_field_name: associated_id_field_name.into(),
            get_one_query: None,
            list_query: None,
            query_variables: None,
            cardinality,
        }
    }

    pub fn with_queries(
        mut self,
        get_one: impl Into<String>,
        list: impl Into<String>,
    ) -> Self {
        self.get_one_query = Some(get_one.into());
        self.list_query = Some(list.into());
        self
    }

    pub fn with_query_variables(
        mut self,
        variables: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.query_variables = Some(Arc::new(variables));
        self
    }
}

impl fmt::Debug for AssociationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociationDescriptor")
            .field("associated_resource", &self.associated_resource)
            .field("parent_id_field_name", &self.parent_id_field_name)
            .field("associated_id_field_name", &self.associated_id_field_name)
            .field("get_one_query", &self.get_one_query)
            .field("list_query", &self.list_query)
            .field("query_variables", &self.query_variables.is_some())
            .field("cardinality", &self.cardinality)
            .finish()
    }
}

impl PartialEq for AssociationDescriptor {
    fn eq(&self, other: &Self) -> bool {
        // Variable providers are compared by presence only
        self.associated_resource == other.associated_resource
            && self.parent_id_field_name == other.parent_id_field_name
            && self.associated_id_field_name == other.associated_id_field_name
            && self.get_one_query == other.get_one_query
            && self.list_query == other.list_query
            && self.query_variables.is_some() == other.query_variables.is_some()
            && self.cardinality == other.cardinality
    }
}

/// Output of a custom render override: an opaque display fragment
/// returned to the renderer unmodified
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomRendered {
    pub text: String,
    pub class: Option<String>,
}

impl CustomRendered {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Custom render override: invoked with the current parent record
#[derive(Clone)]
pub struct CustomRender(Arc<dyn Fn(&Value) -> CustomRendered + Send + Sync>);

impl CustomRender {
    pub fn new(render: impl Fn(&Value) -> CustomRendered + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    pub fn render(&self, parent_record: &Value) -> CustomRendered {
        (self.0)(parent_record)
    }
}

impl fmt::Debug for CustomRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRender(..)")
    }
}

impl PartialEq for CustomRender {
    fn eq(&self, _other: &Self) -> bool {
        // Overrides are opaque; structural equality treats any two as equal
        true
    }
}

/// Generic description of one property, used to drive rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSchema {
    pub label: String,
    pub name: String,
    pub field_type: FieldType,
    /// Enum choices for `Select` fields
    pub options: Vec<SelectOption>,
    /// Recursive schema for nested-object / array-of-object kinds
    pub nested_fields: Vec<FieldSchema>,
    pub is_required: bool,
    pub validation: ValidationRules,
    pub association: Option<AssociationDescriptor>,
    pub custom_render: Option<CustomRender>,
    pub sortable: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.validation.required = true;
        self
    }

    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_nested(mut self, nested: Vec<FieldSchema>) -> Self {
        self.nested_fields = nested;
        self
    }

    pub fn with_association(mut self, association: AssociationDescriptor) -> Self {
        self.association = Some(association);
        self
    }

    pub fn with_custom_render(mut self, render: CustomRender) -> Self {
        self.custom_render = Some(render);
        self.field_type = FieldType::CustomRender;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

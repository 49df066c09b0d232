//! Field type enumeration for the metadata system

/// Kind of editor a field resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Enum choice rendered as a dropdown
    Select,
    /// Date + time value
    DateTime,
    /// Free text
    #[default]
    Input,
    /// Numeric value
    Number,
    /// Checkbox
    Boolean,
    /// Embedded struct (not a list)
    NestedObject,
    /// List of embedded structs or associated records
    Array,
    /// Single dynamically-typed slot; a type must be chosen before the value editor appears
    Unknown,
    /// One dynamically-typed `{name, type, value}` row
    UnknownProperty,
    /// Growable ordered list of `{name, type, value}` rows
    UnknownProperties,
    /// Rendering is delegated to a custom override
    CustomRender,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::DateTime => "datetime",
            Self::Input => "input",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::NestedObject => "nested_object",
            Self::Array => "array",
            Self::Unknown => "unknown",
            Self::UnknownProperty => "unknown_property",
            Self::UnknownProperties => "unknown_properties",
            Self::CustomRender => "custom_render",
        }
    }

    /// Primitive kinds resolve to a plain bound editor
    /// (or a disclosure affordance while an optional field is undisclosed)
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::DateTime | Self::Input | Self::Number | Self::Boolean
        )
    }
}

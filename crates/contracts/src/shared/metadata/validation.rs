//! Validation rules for metadata fields

use serde_json::Value;

/// Validation rules for a single field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ValidationRules {
    /// No constraints, field is optional
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Field must carry a non-empty value
    pub const fn required() -> Self {
        Self {
            required: true,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Validate a string value against the rules
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(format!("{} must not be empty", field_label));
        }

        if let Some(min) = self.min_length {
            if !value.is_empty() && value.chars().count() < min {
                return Err(format!(
                    "{} must contain at least {} characters",
                    field_label, min
                ));
            }
        }

        if let Some(max) = self.max_length {
            if value.chars().count() > max {
                return Err(format!(
                    "{} must not exceed {} characters",
                    field_label, max
                ));
            }
        }

        Ok(())
    }

    /// Validate a numeric value against min/max rules
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} must be at least {}", field_label, min));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} must be at most {}", field_label, max));
            }
        }

        Ok(())
    }

    /// Validate a raw JSON value against the rules
    ///
    /// Dispatches on the value's own kind; `null` and missing values only
    /// fail when the field is required.
    pub fn validate_value(&self, value: Option<&Value>, field_label: &str) -> Result<(), String> {
        match value {
            None | Some(Value::Null) => {
                if self.required {
                    Err(format!("{} is required", field_label))
                } else {
                    Ok(())
                }
            }
            Some(Value::String(s)) => self.validate_string(s, field_label),
            Some(Value::Number(n)) => {
                self.validate_number(n.as_f64().unwrap_or_default(), field_label)
            }
            Some(Value::Bool(_)) => Ok(()),
            Some(Value::Array(items)) => {
                if self.required && items.is_empty() {
                    Err(format!("{} is required", field_label))
                } else {
                    Ok(())
                }
            }
            Some(Value::Object(_)) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rejects_empty_and_null() {
        let rules = ValidationRules::required();
        assert!(rules.validate_value(None, "Name").is_err());
        assert!(rules.validate_value(Some(&Value::Null), "Name").is_err());
        assert!(rules.validate_value(Some(&json!("")), "Name").is_err());
        assert!(rules.validate_value(Some(&json!("Pump")), "Name").is_ok());
    }

    #[test]
    fn test_optional_accepts_missing() {
        let rules = ValidationRules::none();
        assert!(rules.validate_value(None, "Comment").is_ok());
        assert!(rules.validate_value(Some(&Value::Null), "Comment").is_ok());
    }

    #[test]
    fn test_number_range() {
        let rules = ValidationRules::none().with_range(Some(0.0), Some(100.0));
        assert!(rules.validate_value(Some(&json!(50)), "Power").is_ok());
        assert!(rules.validate_value(Some(&json!(-1)), "Power").is_err());
        assert!(rules.validate_value(Some(&json!(101)), "Power").is_err());
    }

    #[test]
    fn test_string_length() {
        let rules = ValidationRules::none().with_length(Some(2), Some(4));
        assert!(rules.validate_value(Some(&json!("abc")), "Code").is_ok());
        assert!(rules.validate_value(Some(&json!("a")), "Code").is_err());
        assert!(rules.validate_value(Some(&json!("abcde")), "Code").is_err());
    }

    #[test]
    fn test_required_array_must_not_be_empty() {
        let rules = ValidationRules::required();
        assert!(rules.validate_value(Some(&json!([])), "Tags").is_err());
        assert!(rules.validate_value(Some(&json!([1])), "Tags").is_ok());
    }
}

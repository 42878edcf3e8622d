use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    MissingField,
    LengthViolation,
    FormatViolation,
    RangeViolation,
    ParseError,
    UniqueViolation,
}

impl FieldErrorKind {
    /// Code attached to the matching `validator` rule.
    pub fn code(self) -> &'static str {
        match self {
            FieldErrorKind::MissingField => "required",
            FieldErrorKind::LengthViolation => "length_violation",
            FieldErrorKind::FormatViolation => "format_violation",
            FieldErrorKind::RangeViolation => "range_violation",
            FieldErrorKind::ParseError => "parse_error",
            FieldErrorKind::UniqueViolation => "unique_violation",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "required" => FieldErrorKind::MissingField,
            "length_violation" | "length" => FieldErrorKind::LengthViolation,
            "range_violation" | "range" => FieldErrorKind::RangeViolation,
            "parse_error" => FieldErrorKind::ParseError,
            "unique_violation" => FieldErrorKind::UniqueViolation,
            _ => FieldErrorKind::FormatViolation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing() -> Self {
        Self::new(FieldErrorKind::MissingField, "This field is required.")
    }
}

/// Field name to error, one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, FieldError>);

impl FormErrors {
    pub fn single(field: impl Into<String>, error: FieldError) -> Self {
        let mut errors = Self::default();
        errors.insert(field, error);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.insert(field.into(), error);
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn kind_of(&self, field: &str) -> Option<FieldErrorKind> {
        self.0.get(field).map(|e| e.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|(field, error)| format!("{field}: {}", error.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();

        for (field, field_errors) in errors.field_errors() {
            let Some(error) = field_errors.first() else {
                continue;
            };

            let kind = FieldErrorKind::from_code(error.code.as_ref());
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));

            form_errors.insert(field.to_string(), FieldError::new(kind, message));
        }

        form_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn validation_errors_map_to_field_kinds() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("required"));
        let mut sku = ValidationError::new("format_violation");
        sku.message = Some(Cow::Borrowed("bad sku"));
        errors.add("sku", sku);

        let form_errors = FormErrors::from(&errors);

        assert!(!form_errors.is_empty());
        assert_eq!(form_errors.kind_of("name"), Some(FieldErrorKind::MissingField));
        assert_eq!(form_errors.get("name").unwrap().message, "Invalid name");
        assert_eq!(form_errors.get("sku").unwrap().message, "bad sku");
        assert_eq!(form_errors.to_string(), "name: Invalid name; sku: bad sku");
    }

    #[test]
    fn no_validation_errors_means_empty_map() {
        let form_errors = FormErrors::from(&ValidationErrors::new());

        assert!(form_errors.is_empty());
        assert_eq!(form_errors.len(), 0);
    }
}

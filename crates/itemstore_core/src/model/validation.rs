//! Field validation rules shared by item and task inputs.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length (in chars) of an item name.
pub const ITEM_NAME_MAX_CHARS: usize = 100;
/// Maximum length (in chars) of item and task descriptions.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Input rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or explicitly null.
    MissingField(&'static str),
    /// Required text field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Text field exceeds its length limit.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Non-nullable field was set to null in a patch.
    NullField(&'static str),
    /// Patch carries no field at all.
    EmptyPatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) | Self::EmptyField(field) => {
                write!(f, "{} is required", field_label(field))
            }
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{} must be at most {max_chars} characters (got {actual_chars})",
                field_label(field)
            ),
            Self::NullField(field) => write!(f, "{} cannot be null", field_label(field)),
            Self::EmptyPatch => write!(f, "No data provided for update"),
        }
    }
}

impl Error for ValidationError {}

/// Checks a required text field and returns it unchanged when valid.
pub(crate) fn require_text<'a>(
    field: &'static str,
    value: Option<&'a str>,
    max_chars: usize,
) -> Result<&'a str, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    check_length(field, value, max_chars)?;
    Ok(value)
}

pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

fn field_label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{require_text, ValidationError};

    #[test]
    fn missing_and_blank_values_are_rejected() {
        assert_eq!(
            require_text("name", None, 10),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            require_text("name", Some("   "), 10),
            Err(ValidationError::EmptyField("name"))
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert_eq!(require_text("name", Some("ééé"), 3), Ok("ééé"));
        assert!(matches!(
            require_text("name", Some("éééé"), 3),
            Err(ValidationError::FieldTooLong {
                actual_chars: 4,
                ..
            })
        ));
    }

    #[test]
    fn messages_use_capitalized_field_labels() {
        assert_eq!(
            ValidationError::MissingField("name").to_string(),
            "Name is required"
        );
        assert_eq!(
            ValidationError::NullField("completed").to_string(),
            "Completed cannot be null"
        );
    }
}

//! Guest-submitted reservation details and their validation rules.
//!
//! Validation errors are reported per field as a list of human-readable
//! messages so a form can be re-displayed next to the offending inputs.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Field name -> messages, ordered by field name for stable output.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Contact details a guest fills in on the reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GuestDetails {
    #[validate(
        custom(function = "short_text"),
        length(min = 3, message = "This field must be at least 3 characters long")
    )]
    #[serde(default)]
    pub first_name: String,

    #[validate(custom(function = "short_text"))]
    #[serde(default)]
    pub last_name: String,

    #[validate(custom(function = "short_text"), email(message = "Invalid email address"))]
    #[serde(default)]
    pub email: String,

    #[validate(custom(function = "short_text"))]
    #[serde(default)]
    pub phone: String,
}

impl GuestDetails {
    /// Run every rule and collect failures per field.
    ///
    /// Returns `Ok(())` when the details are acceptable.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))
    }

    /// Display name used in notifications and the admin grid.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Longest value accepted in any guest field.
pub const MAX_FIELD_LENGTH: usize = 100;

/// A non-blank value of at most [`MAX_FIELD_LENGTH`] characters.
pub fn short_text(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::new("too_long").with_message(Cow::Owned(format!(
            "This field must be at most {MAX_FIELD_LENGTH} characters long"
        ))));
    }
    Ok(())
}

/// Rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("This field cannot be blank")));
    }
    Ok(())
}

/// Flatten `validator` output into [`FieldErrors`].
///
/// Rules without a custom message fall back to their error code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_guest() -> GuestDetails {
        GuestDetails {
            first_name: "Joe".to_string(),
            last_name: "Joyson".to_string(),
            email: "a@b.com".to_string(),
            phone: "555-555-5555".to_string(),
        }
    }

    #[test]
    fn accepts_complete_details() {
        assert!(valid_guest().check().is_ok());
    }

    #[test]
    fn short_first_name_fails_min_length() {
        let guest = GuestDetails {
            first_name: "Jo".to_string(),
            ..valid_guest()
        };
        let errors = guest.check().unwrap_err();
        assert_eq!(
            errors["first_name"],
            vec!["This field must be at least 3 characters long".to_string()]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn malformed_email_fails() {
        let guest = GuestDetails {
            email: "not-an-email".to_string(),
            ..valid_guest()
        };
        let errors = guest.check().unwrap_err();
        assert_eq!(errors["email"], vec!["Invalid email address".to_string()]);
    }

    #[test]
    fn blank_fields_are_reported() {
        let guest = GuestDetails {
            last_name: "   ".to_string(),
            phone: String::new(),
            ..valid_guest()
        };
        let errors = guest.check().unwrap_err();
        assert_eq!(errors["last_name"], vec!["This field cannot be blank".to_string()]);
        assert_eq!(errors["phone"], vec!["This field cannot be blank".to_string()]);
        assert!(!errors.contains_key("first_name"));
    }

    #[test]
    fn empty_first_name_collects_every_message() {
        let guest = GuestDetails {
            first_name: String::new(),
            ..valid_guest()
        };
        let errors = guest.check().unwrap_err();
        let messages = &errors["first_name"];
        assert!(messages.contains(&"This field cannot be blank".to_string()));
        assert!(messages.contains(&"This field must be at least 3 characters long".to_string()));
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let guest = GuestDetails {
            last_name: "x".repeat(MAX_FIELD_LENGTH + 1),
            ..valid_guest()
        };
        let errors = guest.check().unwrap_err();
        assert_eq!(
            errors["last_name"],
            vec![format!("This field must be at most {MAX_FIELD_LENGTH} characters long")]
        );

        let at_limit = GuestDetails {
            last_name: "x".repeat(MAX_FIELD_LENGTH),
            ..valid_guest()
        };
        assert!(at_limit.check().is_ok());
    }

    #[test]
    fn full_name_trims() {
        let guest = GuestDetails {
            first_name: " Joe ".to_string(),
            ..valid_guest()
        };
        assert_eq!(guest.full_name(), "Joe Joyson");
    }
}

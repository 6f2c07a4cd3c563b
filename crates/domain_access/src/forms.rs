//! Form models and their field-level validation
//!
//! Each form derives `validator::Validate`; `FormErrors` flattens the
//! validator output into one message per field, which is what the
//! terminal front-end prints next to a prompt.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use core_kernel::validation::is_valid_phone_number;

/// First validation message per field, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
}

impl FormErrors {
    /// Creates an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field unless one is already present
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message recorded for the field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns true if the field has an error
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field names with errors, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keeps only errors for the listed fields (or their nested paths)
    pub fn retain_fields(&mut self, fields: &[&str]) {
        self.fields.retain(|name, _| {
            fields
                .iter()
                .any(|f| name.as_str() == *f || name.starts_with(&format!("{}.", f)))
        });
    }

    /// Merges errors from another set, keeping existing messages
    pub fn merge(&mut self, other: FormErrors) {
        for (field, message) in other.fields {
            self.insert(field, message);
        }
    }

    /// Merges validator output, prefixing every field name
    pub fn merge_prefixed(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, message) in FormErrors::from(errors).fields {
            self.insert(format!("{}.{}", prefix, field), message);
        }
    }

    /// Ok when empty, otherwise self as the error
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                form_errors.insert(field.to_string(), message);
            }
        }
        form_errors
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        FormErrors::from(&errors)
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Credentials entered on the login screen
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Editable profile details
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 2, message = "Display name must be at least 2 characters"))]
    pub display_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    /// Empty when the user has not given a phone number
    #[serde(default)]
    #[validate(custom(function = "optional_phone"))]
    pub phone: String,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
    #[validate(
        length(min = 1, message = "Please confirm your password"),
        must_match(other = "new_password", message = "Passwords don't match")
    )]
    pub confirm_password: String,
}

fn optional_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || is_valid_phone_number(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("Please enter a valid phone number")))
    }
}

/// Validates any form and returns flattened field errors
pub fn check<T: Validate>(form: &T) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_messages() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = check(&form).unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
    }

    #[test]
    fn test_login_form_valid() {
        let form = LoginForm {
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(check(&form).is_ok());
    }

    #[test]
    fn test_profile_phone_is_optional() {
        let mut form = ProfileForm {
            display_name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: String::new(),
        };
        assert!(check(&form).is_ok());

        form.phone = "12345".to_string();
        let errors = check(&form).unwrap_err();
        assert_eq!(errors.get("phone"), Some("Please enter a valid phone number"));
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let form = PasswordChangeForm {
            current_password: "old-secret".to_string(),
            new_password: "new-secret-1".to_string(),
            confirm_password: "new-secret-2".to_string(),
        };
        let errors = check(&form).unwrap_err();
        assert!(errors.contains("confirm_password"));
        assert!(!errors.contains("new_password"));
    }

    #[test]
    fn test_retain_fields_keeps_nested_paths() {
        let mut errors = FormErrors::new();
        errors.insert("policy_id", "Policy is required");
        errors.insert("items.0.category", "Category is required");
        errors.insert("description", "too short");

        errors.retain_fields(&["items"]);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("items.0.category"));
    }
}

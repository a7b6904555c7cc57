//! Input validation helpers shared by handlers.

use validator::{ValidateEmail, ValidationErrors};

use crate::error::CoreError;

/// Reject empty or whitespace-only values for a required text field.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{email}' is not a valid email address")))
    }
}

/// Normalise an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flatten `validator` derive errors into a single readable message.
///
/// Fields are reported in sorted order so messages are deterministic.
pub fn flatten_errors(errors: &ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{field}: {detail}")
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "invalid email"))]
        email: String,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn blank_values_rejected() {
        assert!(require_non_blank("name", "Ada").is_ok());
        assert!(require_non_blank("name", "   ").is_err());
    }

    #[test]
    fn email_checks() {
        assert!(validate_email("coach@gym.example").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert_eq!(normalize_email("  Coach@Gym.Example "), "coach@gym.example");
    }

    #[test]
    fn flattened_errors_list_every_field() {
        let signup = Signup {
            email: "nope".into(),
            name: String::new(),
        };
        let errors = signup.validate().unwrap_err();
        let CoreError::Validation(msg) = flatten_errors(&errors) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "email: invalid email; name: length");
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

use crate::shared::types::ErrorDetail;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Flatten `validator` derive output into the `{message, field}` list the
/// error boundary renders.
pub fn field_errors(errors: &ValidationErrors) -> Vec<ErrorDetail> {
    let mut details: Vec<ErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                ErrorDetail::with_field(message, field.to_string())
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_username_regex_valid() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("user123"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(USERNAME_REGEX.is_match("JohnDoe"));
    }

    #[test]
    fn test_username_regex_invalid() {
        assert!(!USERNAME_REGEX.is_match("123user")); // starts with digit
        assert!(!USERNAME_REGEX.is_match("-user")); // starts with hyphen
        assert!(!USERNAME_REGEX.is_match("user-name")); // hyphen
        assert!(!USERNAME_REGEX.is_match("user name")); // space
        assert!(!USERNAME_REGEX.is_match("")); // empty
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "username must be at least 3 characters"))]
        username: String,
    }

    #[test]
    fn test_field_errors_carry_field_and_message() {
        let sample = Sample {
            username: "ab".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let details = field_errors(&errors);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field.as_deref(), Some("username"));
        assert_eq!(details[0].message, "username must be at least 3 characters");
    }
}

//! Input validation
//!
//! Validators append to a [`ValidationErrors`] instead of returning early,
//! so a rejected payload reports every offending field at once.

use serde::Serialize;
use std::fmt;

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All violations found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the violated fields, in the order they were checked
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Require a non-blank value
pub fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "is required");
        return false;
    }
    true
}

/// Require a length (in characters) within `min..=max`
pub fn length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> bool {
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(
            field,
            format!("must be between {} and {} characters", min, max),
        );
        return false;
    }
    true
}

/// Check the shape of an email address: one `@`, a non-empty local part
/// and a dotted domain, no whitespace
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// ASCII digits only
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_email() {
        assert!(is_email("a@x.com"));
        assert!(is_email("first.last@mail.example.org"));
        assert!(!is_email("invalid"));
        assert!(!is_email("@x.com"));
        assert!(!is_email("a@x"));
        assert!(!is_email("a@x..com"));
        assert!(!is_email("a@b@x.com"));
        assert!(!is_email("a b@x.com"));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("12345678901"));
        assert!(!is_numeric("rama"));
        assert!(!is_numeric("+62812345678"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn test_length_counts_characters() {
        let mut errors = ValidationErrors::new();
        assert!(length(&mut errors, "username", "żółw", 3, 30));
        assert!(!length(&mut errors, "username", "ab", 3, 30));
        assert_eq!(errors.fields(), vec!["username"]);
        assert_eq!(
            errors.to_string(),
            "username: must be between 3 and 30 characters"
        );
    }
}

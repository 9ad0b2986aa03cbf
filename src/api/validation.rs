use std::collections::HashMap;
use chrono::{DateTime, Utc};
use crate::error::AppError;

/// Accumulates per-field problems so a response can report them all at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors.insert(field.to_string(), format!("{} is required", field));
        }
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.errors.insert(field.to_string(), message.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFields(self.errors))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

pub fn one_of(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}

pub fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("{} must be an RFC 3339 timestamp", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@nodot"));
        assert!(!is_valid_email("ana@.com"));
    }

    #[test]
    fn field_errors_collect() {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("name", "  ");
        errors.require_non_empty("email", "x@y.z");
        errors.check("role", false, "role must be one of employee, manager, admin");

        match errors.into_result() {
            Err(AppError::ValidationFields(map)) => {
                assert_eq!(map.len(), 2);
                assert!(map.contains_key("name"));
                assert!(map.contains_key("role"));
            }
            other => panic!("expected ValidationFields, got {:?}", other.err()),
        }
    }

    #[test]
    fn datetime_parsing() {
        assert!(parse_datetime("due_date", "2024-06-01T10:00:00Z").is_ok());
        assert!(parse_datetime("due_date", "2024-06-01T10:00:00+02:00").is_ok());
        assert!(parse_datetime("due_date", "tomorrow").is_err());
    }
}

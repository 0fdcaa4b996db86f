//! Bridge from `validator` field checks to graph violations
//!
//! Types that derive `validator::Validate` can use `check_with_validator` as
//! their single-object constraint check. Field errors become one violation
//! each, keyed by field name; fields are reported in name order so repeated
//! validations produce identical results.

use crate::domain::violations::ValidationResult;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Run `validator` checks on a single object
pub fn check_with_validator<T: Validate + ?Sized>(value: &T) -> Vec<ValidationResult> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => from_validation_errors(&errors),
    }
}

/// Convert `validator` errors into violations.
///
/// Nested struct and list errors are flattened with `.`-joined field names;
/// list positions are not encoded.
pub fn from_validation_errors(errors: &ValidationErrors) -> Vec<ValidationResult> {
    let mut results = Vec::new();
    collect(errors, None, &mut results);
    results
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, results: &mut Vec<ValidationResult>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                results.extend(
                    field_errors
                        .iter()
                        .map(|error| ValidationResult::for_member(message_of(error), path.as_str())),
                );
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), results),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect(nested, Some(&path), results);
                }
            }
        }
    }
}

fn message_of(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Contact {
        #[validate(required)]
        email: Option<String>,
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn test_valid_object_has_no_violations() {
        let contact = Contact {
            email: Some("a@example.com".to_string()),
            name: "Ada".to_string(),
        };

        assert!(check_with_validator(&contact).is_empty());
    }

    #[test]
    fn test_field_errors_become_violations() {
        let contact = Contact {
            email: None,
            name: String::new(),
        };

        let results = check_with_validator(&contact);

        assert_eq!(
            results,
            vec![
                ValidationResult::for_member("required", "email"),
                ValidationResult::for_member("must not be empty", "name"),
            ]
        );
    }

    #[test]
    fn test_repeated_checks_are_stable() {
        let contact = Contact {
            email: None,
            name: String::new(),
        };

        assert_eq!(check_with_validator(&contact), check_with_validator(&contact));
    }
}

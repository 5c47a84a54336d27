//! Validation error types
//!
//! Violations are kept structured (field, rendered value, cause, optional
//! inner violation) and only turned into text when displayed.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::rules::{RuleName, RuleSyntaxError};
use crate::types::ValueKind;

// ============================================================================
// Validation Result
// ============================================================================

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidateError>;

/// Failure of a top-level validation call
#[derive(Debug, Clone, Error)]
pub enum ValidateError {
    /// The value handed to the validator is not a record
    #[error("wrong argument given, should be a record, got {0}")]
    NotARecord(ValueKind),

    /// The record was walked and at least one violation was found
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl ValidateError {
    pub fn is_not_a_record(&self) -> bool {
        matches!(self, Self::NotARecord(_))
    }

    /// Kinds of every reported failure, in order
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self {
            Self::NotARecord(_) => vec![ErrorKind::NotARecord],
            Self::Invalid(errors) => errors.kinds(),
        }
    }

    /// The collected violations, if the record was walked
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::NotARecord(_) => None,
        }
    }
}

// ============================================================================
// Error Kind Classification
// ============================================================================

/// Classification of validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Validation was called on something that is not a record
    NotARecord,
    /// A field's rule specification could not be parsed
    InvalidSyntax,
    /// A non-public field carries an annotation
    NotValidatable,
    /// A rule was applied to a kind it does not support
    UnsupportedKind,
    /// A range, length or membership check failed
    RuleFailed,
    /// An integer too wide for 64-bit bounds met an integer rule
    OutOfRange,
    /// A record's values do not line up with its fields
    MalformedRecord,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARecord => write!(f, "not_a_record"),
            Self::InvalidSyntax => write!(f, "invalid_syntax"),
            Self::NotValidatable => write!(f, "not_validatable"),
            Self::UnsupportedKind => write!(f, "unsupported_kind"),
            Self::RuleFailed => write!(f, "rule_failed"),
            Self::OutOfRange => write!(f, "out_of_range"),
            Self::MalformedRecord => write!(f, "malformed_record"),
        }
    }
}

// ============================================================================
// Rule Violations
// ============================================================================

/// Failure of a single rule against a single value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RuleViolation {
    #[error("validation parameter '{rule}' isn't defined for {kind}")]
    UnsupportedKind { rule: RuleName, kind: ValueKind },

    #[error("should have fixed length {expected}")]
    LengthMismatch { expected: i64 },

    #[error("shouldn't be less than {min}")]
    BelowMinimum { min: i64 },

    #[error("shouldn't be shorter than {min}")]
    TooShort { min: i64 },

    #[error("shouldn't be great than {max}")]
    AboveMaximum { max: i64 },

    #[error("shouldn't be longer than {max}")]
    TooLong { max: i64 },

    #[error("should be one of {}", render_set(.allowed))]
    NotInSet { allowed: BTreeSet<String> },

    #[error("integer {value} is out of the 64-bit range")]
    OutOfRange { value: String },
}

impl RuleViolation {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedKind { .. } => ErrorKind::UnsupportedKind,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            _ => ErrorKind::RuleFailed,
        }
    }
}

fn render_set(values: &BTreeSet<String>) -> String {
    let tokens: Vec<&str> = values.iter().map(String::as_str).collect();
    format!("{{{}}}", tokens.join(", "))
}

// ============================================================================
// Single Validation Error
// ============================================================================

/// One entry of a [`ValidationErrors`] collection
///
/// Field failures display as `field: F, value: V, error: E`. The structural
/// entries (`InvalidSyntax`, `NotValidatable`, `MissingValue`) have no value
/// and display as `field: F, error: E`; `ExtraValues` displays as
/// `record: R, error: E`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ValidationError {
    /// The field's rule specification could not be parsed
    InvalidSyntax {
        field: String,
        source: RuleSyntaxError,
    },

    /// A non-public field carries an annotation
    NotValidatable { field: String },

    /// The record holds no value for this field
    MissingValue { field: String },

    /// The record holds more values than it has fields
    ExtraValues { record: String, count: usize },

    /// A failure attached to a field and the value it held
    Field {
        field: String,
        value: String,
        cause: FieldCause,
    },
}

/// What went wrong inside a field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldCause {
    /// A rule failed on the field's value (or one of its elements)
    Rule(RuleViolation),
    /// A violation inside the nested record held by the field
    Nested(Box<ValidationError>),
}

impl ValidationError {
    /// Create a rule failure for a field
    pub fn rule(field: impl Into<String>, value: impl Into<String>, violation: RuleViolation) -> Self {
        Self::Field {
            field: field.into(),
            value: value.into(),
            cause: FieldCause::Rule(violation),
        }
    }

    /// Wrap an inner violation with the field that held the nested record
    pub fn nested(field: impl Into<String>, value: impl Into<String>, inner: ValidationError) -> Self {
        Self::Field {
            field: field.into(),
            value: value.into(),
            cause: FieldCause::Nested(Box::new(inner)),
        }
    }

    /// Name of the outermost field this entry is attached to (the record
    /// name for `ExtraValues`)
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidSyntax { field, .. }
            | Self::NotValidatable { field }
            | Self::MissingValue { field }
            | Self::Field { field, .. } => field,
            Self::ExtraValues { record, .. } => record,
        }
    }

    /// Classification of the innermost cause
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSyntax { .. } => ErrorKind::InvalidSyntax,
            Self::NotValidatable { .. } => ErrorKind::NotValidatable,
            Self::MissingValue { .. } | Self::ExtraValues { .. } => ErrorKind::MalformedRecord,
            Self::Field { cause, .. } => match cause {
                FieldCause::Rule(violation) => violation.kind(),
                FieldCause::Nested(inner) => inner.kind(),
            },
        }
    }

    /// Number of record levels this entry is wrapped in (0 for a direct field)
    pub fn depth(&self) -> usize {
        match self {
            Self::Field {
                cause: FieldCause::Nested(inner),
                ..
            } => 1 + inner.depth(),
            _ => 0,
        }
    }

    /// Field names from the outermost record down to the failing field
    pub fn path(&self) -> Vec<&str> {
        let mut path = vec![self.field()];
        if let Self::Field {
            cause: FieldCause::Nested(inner),
            ..
        } = self
        {
            path.extend(inner.path());
        }
        path
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax { field, source } => {
                write!(f, "field: {}, error: {}", field, source)
            }
            Self::NotValidatable { field } => {
                write!(
                    f,
                    "field: {}, error: validation for non-public field is not allowed",
                    field
                )
            }
            Self::MissingValue { field } => {
                write!(f, "field: {}, error: no value given for field", field)
            }
            Self::ExtraValues { record, count } => {
                write!(
                    f,
                    "record: {}, error: {} value(s) given beyond the last field",
                    record, count
                )
            }
            Self::Field { field, value, cause } => {
                write!(f, "field: {}, value: {}, error: {}", field, value, cause)
            }
        }
    }
}

impl fmt::Display for FieldCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(violation) => write!(f, "{}", violation),
            Self::Nested(inner) => write!(f, "{}", inner),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Validation Errors Collection
// ============================================================================

/// Collection of validation errors, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValidationErrors {
    /// List of individual validation errors
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add a validation error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add multiple validation errors
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// Convert to Result - Ok if no errors, Err if there are errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Get errors as a slice
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Kinds of every entry, in order
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(ValidationError::kind).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn too_big() -> ValidationError {
        ValidationError::rule("MaxA", "6", RuleViolation::AboveMaximum { max: 4 })
    }

    #[test]
    fn test_validation_errors_empty() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_validation_errors_add() {
        let mut errors = ValidationErrors::new();
        errors.add(too_big());
        assert!(!errors.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_rule_violation_display() {
        assert_eq!(
            RuleViolation::AboveMaximum { max: 4 }.to_string(),
            "shouldn't be great than 4"
        );
        assert_eq!(
            RuleViolation::UnsupportedKind {
                rule: RuleName::Len,
                kind: ValueKind::Integer,
            }
            .to_string(),
            "validation parameter 'len' isn't defined for integer"
        );
        let allowed = ["30", "25"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            RuleViolation::NotInSet { allowed }.to_string(),
            "should be one of {25, 30}"
        );
        assert_eq!(
            RuleViolation::NotInSet {
                allowed: BTreeSet::new()
            }
            .to_string(),
            "should be one of {}"
        );
    }

    #[test]
    fn test_field_error_display() {
        assert_eq!(
            too_big().to_string(),
            "field: MaxA, value: 6, error: shouldn't be great than 4"
        );
    }

    #[test]
    fn test_nested_error_display_and_depth() {
        let inner = too_big();
        let outer = ValidationError::nested("Nested", "{6 abcdef}", inner);
        let outermost = ValidationError::nested("Root", "{{6 abcdef}}", outer.clone());

        assert_eq!(
            outer.to_string(),
            "field: Nested, value: {6 abcdef}, error: field: MaxA, value: 6, error: shouldn't be great than 4"
        );
        assert_eq!(outer.depth(), 1);
        assert_eq!(outermost.depth(), 2);
        assert_eq!(outermost.path(), vec!["Root", "Nested", "MaxA"]);
        assert_eq!(outermost.kind(), ErrorKind::RuleFailed);
    }

    #[test]
    fn test_structural_error_kinds() {
        let syntax = ValidationError::InvalidSyntax {
            field: "Foo".to_string(),
            source: RuleSyntaxError::InvalidBound {
                rule: RuleName::Len,
                argument: "abc".to_string(),
            },
        };
        let hidden = ValidationError::NotValidatable {
            field: "foo".to_string(),
        };
        assert_eq!(syntax.kind(), ErrorKind::InvalidSyntax);
        assert_eq!(hidden.kind(), ErrorKind::NotValidatable);
        assert_eq!(
            hidden.to_string(),
            "field: foo, error: validation for non-public field is not allowed"
        );
        let wrapped = ValidationError::nested("Outer", "{}", hidden);
        assert_eq!(wrapped.kind(), ErrorKind::NotValidatable);
    }

    #[test]
    fn test_malformed_record_entries() {
        let missing = ValidationError::MissingValue {
            field: "B".to_string(),
        };
        let extra = ValidationError::ExtraValues {
            record: "Pair".to_string(),
            count: 2,
        };
        assert_eq!(missing.kind(), ErrorKind::MalformedRecord);
        assert_eq!(missing.to_string(), "field: B, error: no value given for field");
        assert_eq!(extra.kind(), ErrorKind::MalformedRecord);
        assert_eq!(extra.field(), "Pair");
        assert_eq!(
            extra.to_string(),
            "record: Pair, error: 2 value(s) given beyond the last field"
        );
    }

    #[test]
    fn test_out_of_range_violation() {
        let violation = RuleViolation::OutOfRange {
            value: "18446744073709551615".to_string(),
        };
        assert_eq!(violation.kind(), ErrorKind::OutOfRange);
        assert_eq!(
            violation.to_string(),
            "integer 18446744073709551615 is out of the 64-bit range"
        );
    }

    #[test]
    fn test_collection_display_joins_lines() {
        let errors: ValidationErrors = vec![
            too_big(),
            ValidationError::rule("LenB", "abcdef", RuleViolation::LengthMismatch { expected: 3 }),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            errors.to_string(),
            "field: MaxA, value: 6, error: shouldn't be great than 4\n\
             field: LenB, value: abcdef, error: should have fixed length 3"
        );
        assert_eq!(errors.kinds(), vec![ErrorKind::RuleFailed, ErrorKind::RuleFailed]);
    }

    #[test]
    fn test_not_a_record_error() {
        let err = ValidateError::NotARecord(ValueKind::Map);
        assert!(err.is_not_a_record());
        assert!(err.violations().is_none());
        assert_eq!(
            err.to_string(),
            "wrong argument given, should be a record, got map"
        );
    }
}

//! Core validation engine
//!
//! The walker visits a record's fields in declaration order. For each
//! annotated field it first walks a nested record (wrapping every inner
//! violation with the field's name and value), then parses the field's rule
//! specification and applies every rule, once for a scalar or once per
//! element for a sequence. Nothing aborts the walk: every problem found is
//! collected.

use crate::config::{UnannotatedRecords, ValidationConfig};
use crate::errors::{ValidateError, ValidationError, ValidationErrors, ValidationResult};
use crate::rules::{parse_rules, Rule};
use crate::types::{FieldDescriptor, RecordValue, ToValue, Value};

// ============================================================================
// Public API
// ============================================================================

/// Validate anything convertible into a [`Value`]
///
/// This is the main entry point for validation. It fails with
/// [`ValidateError::NotARecord`] when the value is not a record, and with
/// [`ValidateError::Invalid`] carrying every violation found otherwise.
///
/// # Example
///
/// ```
/// use fieldrules::{validate, FieldDescriptor, RecordSchema, RecordValue, Value};
///
/// let schema = RecordSchema::new("Args")
///     .field(FieldDescriptor::new("A").rules("min:2;max:4"))
///     .build();
/// let args = RecordValue::new(schema, vec![Value::Int(5)]);
///
/// let err = validate(&args).unwrap_err();
/// assert_eq!(err.to_string(), "field: A, value: 5, error: shouldn't be great than 4");
/// ```
pub fn validate<T: ToValue + ?Sized>(value: &T) -> ValidationResult<()> {
    Validator::new().validate(value)
}

/// Validate a [`Value`] with the default configuration
pub fn validate_value(value: &Value) -> ValidationResult<()> {
    Validator::new().validate_value(value)
}

/// Walk a record with the default configuration and return every violation
pub fn validate_record(record: &RecordValue) -> ValidationErrors {
    Validator::new().validate_record(record)
}

// ============================================================================
// Validator
// ============================================================================

/// A validator with a fixed configuration.
///
/// Holds no state between calls, so one instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a validator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with a custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate anything convertible into a [`Value`]
    pub fn validate<T: ToValue + ?Sized>(&self, value: &T) -> ValidationResult<()> {
        self.validate_value(&value.to_value())
    }

    /// Validate a [`Value`]; only records are accepted
    pub fn validate_value(&self, value: &Value) -> ValidationResult<()> {
        let Value::Record(record) = value else {
            return Err(ValidateError::NotARecord(value.kind()));
        };

        let errors = self.validate_record(record);
        tracing::debug!(
            record = %record.name(),
            violations = errors.len(),
            "record validated"
        );

        errors.into_result().map_err(ValidateError::Invalid)
    }

    /// Walk a record and return every violation, in discovery order
    pub fn validate_record(&self, record: &RecordValue) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (field, value) in record.fields() {
            self.validate_field(field, value, &mut errors);
        }

        if !record.is_complete() {
            tracing::debug!(record = %record.name(), "record values do not match its fields");
            errors.extend(record.missing_fields().iter().map(|field| {
                ValidationError::MissingValue {
                    field: field.name.clone(),
                }
            }));
            let count = record.surplus_values();
            if count > 0 {
                errors.add(ValidationError::ExtraValues {
                    record: record.name().to_string(),
                    count,
                });
            }
        }
        errors
    }

    // ========================================================================
    // Field Walk
    // ========================================================================

    fn validate_field(&self, field: &FieldDescriptor, value: &Value, errors: &mut ValidationErrors) {
        let Some(spec) = field.rules.as_deref() else {
            match (self.config.unannotated_records, value) {
                (UnannotatedRecords::Walk, Value::Record(nested)) => {
                    self.validate_nested(field, value, nested, errors);
                }
                _ => tracing::trace!(field = %field.name, "no annotation, skipped"),
            }
            return;
        };

        if !field.visibility.is_public() {
            tracing::debug!(field = %field.name, "annotated field is not public");
            errors.add(ValidationError::NotValidatable {
                field: field.name.clone(),
            });
            return;
        }

        if let Value::Record(nested) = value {
            self.validate_nested(field, value, nested, errors);
        }

        let rules = match parse_rules(spec) {
            Ok(rules) => rules,
            Err(source) => {
                tracing::debug!(field = %field.name, spec, error = %source, "bad rule specification");
                errors.add(ValidationError::InvalidSyntax {
                    field: field.name.clone(),
                    source,
                });
                return;
            }
        };

        match value {
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    let name = self.config.element_name(&field.name, i);
                    apply_rules(&rules, &name, item, errors);
                }
            }
            _ => apply_rules(&rules, &field.name, value, errors),
        }
    }

    fn validate_nested(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        nested: &RecordValue,
        errors: &mut ValidationErrors,
    ) {
        let inner = self.validate_record(nested);
        if inner.is_empty() {
            return;
        }

        let rendered = value.to_string();
        errors.extend(
            inner
                .into_iter()
                .map(|error| ValidationError::nested(field.name.as_str(), rendered.as_str(), error)),
        );
    }
}

// ============================================================================
// Rule Application
// ============================================================================

fn apply_rules(rules: &[Rule], field: &str, value: &Value, errors: &mut ValidationErrors) {
    let mut rendered: Option<String> = None;

    for rule in rules {
        if let Err(violation) = rule.evaluator().evaluate(value) {
            let rendered = rendered.get_or_insert_with(|| value.to_string());
            errors.add(ValidationError::rule(field, rendered.as_str(), violation));
        }
    }
}

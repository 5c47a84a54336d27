//! fieldrules
//!
//! Declarative field validation for Rust records.
//!
//! Annotate the fields of a domain type once with a small rule language and
//! validate instances at call sites. A validation call walks the record,
//! nested records and sequences included, and reports every violation it
//! finds in one aggregated error, not just the first.
//!
//! # Rule Language
//!
//! ```text
//! min:2;max:6        integer bounds, or rune-count bounds for strings
//! len:3              exact rune count (strings only)
//! in:foo,bar         membership; integers compare by their decimal form
//! ```
//!
//! Unknown rule names are ignored. A malformed integer bound rejects the
//! whole specification of that field.
//!
//! # Features
//!
//! - **Default**: Core validation
//! - **serde**: `Serialize` for violation reports
//!
//! # Example
//!
//! ```rust
//! use fieldrules::{record, validate, ErrorKind, ValidateError};
//!
//! record! {
//!     pub struct Request {
//!         #[validate("min:2;max:4")]
//!         pub a: i64,
//!         #[validate("max:2")]
//!         pub tags: Vec<String>,
//!     }
//! }
//!
//! let request = Request {
//!     a: 5,
//!     tags: vec!["ok".to_string(), "too long".to_string()],
//! };
//!
//! match validate(&request) {
//!     Err(ValidateError::Invalid(errors)) => {
//!         assert_eq!(errors.len(), 2);
//!         assert_eq!(errors.kinds(), vec![ErrorKind::RuleFailed; 2]);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

mod macros;

// Public modules
pub mod config;
pub mod errors;
pub mod evaluators;
pub mod rules;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use config::{SequencePaths, UnannotatedRecords, ValidationConfig};
pub use errors::{
    ErrorKind, FieldCause, RuleViolation, ValidateError, ValidationError, ValidationErrors,
    ValidationResult,
};
pub use evaluators::{Evaluate, InRule, IntegerRule, LenRule, MaxRule, MinRule, TextRule};
pub use rules::{parse_rules, Rule, RuleName, RuleSyntaxError};
pub use types::{
    FieldDescriptor, Record, RecordSchema, RecordValue, ToValue, Value, ValueKind, Visibility,
};
pub use validators::{validate, validate_record, validate_value, Validator};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

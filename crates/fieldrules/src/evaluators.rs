//! Built-in rule evaluators
//!
//! Each rule implements only the capabilities it supports:
//!
//! | Rule  | integer             | string                  |
//! |-------|---------------------|-------------------------|
//! | `len` | -                   | rune count == n         |
//! | `min` | value >= n          | rune count >= n         |
//! | `max` | value <= n          | rune count <= n         |
//! | `in`  | decimal form in set | value in set            |
//!
//! Integers outside the i64 range fail `min` and `max` as out of range;
//! `in` still compares their decimal form.
//!
//! Applying a rule to a kind it has no capability for is reported as
//! [`RuleViolation::UnsupportedKind`], never skipped.

use std::collections::BTreeSet;

use crate::errors::RuleViolation;
use crate::rules::RuleName;
use crate::types::Value;

// ============================================================================
// Capabilities
// ============================================================================

/// A rule that can check integer values
pub trait IntegerRule {
    fn check_integer(&self, value: i64) -> Result<(), RuleViolation>;

    /// Check an integer outside the i64 range, given in decimal form.
    /// Bounds are 64-bit, so by default the value is reported out of range.
    fn check_wide_integer(&self, digits: &str) -> Result<(), RuleViolation> {
        Err(RuleViolation::OutOfRange {
            value: digits.to_string(),
        })
    }
}

/// A rule that can check text values
pub trait TextRule {
    fn check_text(&self, value: &str) -> Result<(), RuleViolation>;
}

/// Kind dispatch over the capabilities a rule exposes
pub trait Evaluate {
    /// Rule name, used in unsupported-kind reports
    fn name(&self) -> RuleName;

    fn as_integer_rule(&self) -> Option<&dyn IntegerRule> {
        None
    }

    fn as_text_rule(&self) -> Option<&dyn TextRule> {
        None
    }

    /// Evaluate the rule against a scalar value
    fn evaluate(&self, value: &Value) -> Result<(), RuleViolation> {
        let outcome = match value {
            Value::Int(n) => self.as_integer_rule().map(|rule| rule.check_integer(*n)),
            Value::BigInt(digits) => self
                .as_integer_rule()
                .map(|rule| rule.check_wide_integer(digits)),
            Value::String(s) => self.as_text_rule().map(|rule| rule.check_text(s)),
            _ => None,
        };

        outcome.unwrap_or_else(|| {
            Err(RuleViolation::UnsupportedKind {
                rule: self.name(),
                kind: value.kind(),
            })
        })
    }
}

/// Length of a string in characters, not bytes
fn rune_count(s: &str) -> i64 {
    i64::try_from(s.chars().count()).unwrap_or(i64::MAX)
}

// ============================================================================
// len
// ============================================================================

/// Exact length in characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenRule {
    len: i64,
}

impl LenRule {
    pub fn new(len: i64) -> Self {
        Self { len }
    }

    pub fn expected(&self) -> i64 {
        self.len
    }
}

impl TextRule for LenRule {
    fn check_text(&self, value: &str) -> Result<(), RuleViolation> {
        if rune_count(value) != self.len {
            return Err(RuleViolation::LengthMismatch { expected: self.len });
        }
        Ok(())
    }
}

impl Evaluate for LenRule {
    fn name(&self) -> RuleName {
        RuleName::Len
    }

    fn as_text_rule(&self) -> Option<&dyn TextRule> {
        Some(self)
    }
}

// ============================================================================
// min
// ============================================================================

/// Inclusive lower bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinRule {
    min: i64,
}

impl MinRule {
    pub fn new(min: i64) -> Self {
        Self { min }
    }

    pub fn min(&self) -> i64 {
        self.min
    }
}

impl IntegerRule for MinRule {
    fn check_integer(&self, value: i64) -> Result<(), RuleViolation> {
        if value < self.min {
            return Err(RuleViolation::BelowMinimum { min: self.min });
        }
        Ok(())
    }
}

impl TextRule for MinRule {
    fn check_text(&self, value: &str) -> Result<(), RuleViolation> {
        if rune_count(value) < self.min {
            return Err(RuleViolation::TooShort { min: self.min });
        }
        Ok(())
    }
}

impl Evaluate for MinRule {
    fn name(&self) -> RuleName {
        RuleName::Min
    }

    fn as_integer_rule(&self) -> Option<&dyn IntegerRule> {
        Some(self)
    }

    fn as_text_rule(&self) -> Option<&dyn TextRule> {
        Some(self)
    }
}

// ============================================================================
// max
// ============================================================================

/// Inclusive upper bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxRule {
    max: i64,
}

impl MaxRule {
    pub fn new(max: i64) -> Self {
        Self { max }
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl IntegerRule for MaxRule {
    fn check_integer(&self, value: i64) -> Result<(), RuleViolation> {
        if value > self.max {
            return Err(RuleViolation::AboveMaximum { max: self.max });
        }
        Ok(())
    }
}

impl TextRule for MaxRule {
    fn check_text(&self, value: &str) -> Result<(), RuleViolation> {
        if rune_count(value) > self.max {
            return Err(RuleViolation::TooLong { max: self.max });
        }
        Ok(())
    }
}

impl Evaluate for MaxRule {
    fn name(&self) -> RuleName {
        RuleName::Max
    }

    fn as_integer_rule(&self) -> Option<&dyn IntegerRule> {
        Some(self)
    }

    fn as_text_rule(&self) -> Option<&dyn TextRule> {
        Some(self)
    }
}

// ============================================================================
// in
// ============================================================================

/// Membership in a set of string tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InRule {
    values: BTreeSet<String>,
}

impl InRule {
    pub fn new(values: BTreeSet<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    fn check(&self, token: &str) -> Result<(), RuleViolation> {
        if !self.values.contains(token) {
            return Err(RuleViolation::NotInSet {
                allowed: self.values.clone(),
            });
        }
        Ok(())
    }
}

impl IntegerRule for InRule {
    fn check_integer(&self, value: i64) -> Result<(), RuleViolation> {
        self.check(&value.to_string())
    }

    fn check_wide_integer(&self, digits: &str) -> Result<(), RuleViolation> {
        self.check(digits)
    }
}

impl TextRule for InRule {
    fn check_text(&self, value: &str) -> Result<(), RuleViolation> {
        self.check(value)
    }
}

impl Evaluate for InRule {
    fn name(&self) -> RuleName {
        RuleName::In
    }

    fn as_integer_rule(&self) -> Option<&dyn IntegerRule> {
        Some(self)
    }

    fn as_text_rule(&self) -> Option<&dyn TextRule> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueKind;

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_len_counts_runes() {
        let rule = LenRule::new(3);
        assert!(rule.evaluate(&text("abc")).is_ok());
        assert!(rule.evaluate(&text("日本語")).is_ok());
        assert_eq!(
            rule.evaluate(&text("abcd")),
            Err(RuleViolation::LengthMismatch { expected: 3 })
        );
        assert!(LenRule::new(0).evaluate(&text("")).is_ok());
        assert!(LenRule::new(-6).evaluate(&text("abcd")).is_err());
    }

    #[test]
    fn test_len_is_not_defined_for_integers() {
        assert_eq!(
            LenRule::new(3).evaluate(&Value::Int(123)),
            Err(RuleViolation::UnsupportedKind {
                rule: RuleName::Len,
                kind: ValueKind::Integer,
            })
        );
    }

    #[test]
    fn test_min() {
        let rule = MinRule::new(10);
        assert!(rule.evaluate(&Value::Int(10)).is_ok());
        assert_eq!(
            rule.evaluate(&Value::Int(9)),
            Err(RuleViolation::BelowMinimum { min: 10 })
        );
        assert!(rule.evaluate(&text("abcdefghjkl")).is_ok());
        assert_eq!(
            rule.evaluate(&text("ef")),
            Err(RuleViolation::TooShort { min: 10 })
        );
        assert!(MinRule::new(-1).evaluate(&text("")).is_ok());
        assert!(MinRule::new(-10).evaluate(&Value::Int(-9)).is_ok());
    }

    #[test]
    fn test_max() {
        let rule = MaxRule::new(4);
        assert!(rule.evaluate(&Value::Int(4)).is_ok());
        assert_eq!(
            rule.evaluate(&Value::Int(5)),
            Err(RuleViolation::AboveMaximum { max: 4 })
        );
        assert_eq!(
            rule.evaluate(&text("abcde")),
            Err(RuleViolation::TooLong { max: 4 })
        );
        assert!(rule.evaluate(&text("ñañá")).is_ok());
        assert!(MaxRule::new(-7).evaluate(&text("ab")).is_err());
    }

    #[test]
    fn test_in_integer_uses_decimal_form() {
        let rule = InRule::new(set(&["5", "7", "-3"]));
        assert!(rule.evaluate(&Value::Int(5)).is_ok());
        assert!(rule.evaluate(&Value::Int(-3)).is_ok());
        assert_eq!(
            rule.evaluate(&Value::Int(6)),
            Err(RuleViolation::NotInSet {
                allowed: set(&["5", "7", "-3"]),
            })
        );
    }

    #[test]
    fn test_in_text_is_case_sensitive() {
        let rule = InRule::new(set(&["foo", "bar"]));
        assert!(rule.evaluate(&text("bar")).is_ok());
        assert!(rule.evaluate(&text("Bar")).is_err());
    }

    #[test]
    fn test_empty_set_always_fails() {
        let rule = InRule::new(BTreeSet::new());
        assert!(rule.evaluate(&text("")).is_err());
        assert!(rule.evaluate(&Value::Int(0)).is_err());
    }

    #[test]
    fn test_wide_integers() {
        let wide = Value::BigInt("18446744073709551615".to_string());
        let out_of_range = Err(RuleViolation::OutOfRange {
            value: "18446744073709551615".to_string(),
        });
        assert_eq!(MinRule::new(0).evaluate(&wide), out_of_range);
        assert_eq!(MaxRule::new(10).evaluate(&wide), out_of_range);

        let members = ["18446744073709551615".to_string()].into_iter().collect();
        assert_eq!(InRule::new(members).evaluate(&wide), Ok(()));

        assert_eq!(
            LenRule::new(3).evaluate(&wide),
            Err(RuleViolation::UnsupportedKind {
                rule: RuleName::Len,
                kind: ValueKind::Integer,
            })
        );
    }

    #[test]
    fn test_unsupported_kinds() {
        let rules: Vec<Box<dyn Evaluate>> = vec![
            Box::new(LenRule::new(1)),
            Box::new(MinRule::new(1)),
            Box::new(MaxRule::new(1)),
            Box::new(InRule::new(set(&["true"]))),
        ];
        for rule in &rules {
            for value in [Value::Bool(true), Value::Float(1.0), Value::List(vec![])] {
                assert!(matches!(
                    rule.evaluate(&value),
                    Err(RuleViolation::UnsupportedKind { rule: name, kind })
                        if name == rule.name() && kind == value.kind()
                ));
            }
        }
    }
}

//! Rule specification grammar
//!
//! A rule specification is the annotation string attached to a field:
//!
//! ```text
//! spec   ::= clause (";" clause)*
//! clause ::= name ":" argument
//! name   ::= "len" | "min" | "max" | "in"
//! ```
//!
//! Unknown names (including the empty name produced by stray semicolons)
//! are ignored. A malformed integer bound rejects the whole specification.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::evaluators::{Evaluate, InRule, LenRule, MaxRule, MinRule};

// ============================================================================
// Rule Names
// ============================================================================

/// Name of a built-in rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RuleName {
    Len,
    Min,
    Max,
    In,
}

impl RuleName {
    /// Resolve a clause name; `None` for names this engine does not know
    pub fn from_clause(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Self::Len),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Len => "len",
            Self::Min => "min",
            Self::Max => "max",
            Self::In => "in",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Rule Descriptors
// ============================================================================

/// One parsed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Exact rune count
    Len(LenRule),
    /// Lower bound (value or rune count)
    Min(MinRule),
    /// Upper bound (value or rune count)
    Max(MaxRule),
    /// Membership in a set of string tokens
    In(InRule),
}

impl Rule {
    pub fn name(&self) -> RuleName {
        self.evaluator().name()
    }

    /// The evaluator backing this rule
    pub fn evaluator(&self) -> &dyn Evaluate {
        match self {
            Self::Len(rule) => rule,
            Self::Min(rule) => rule,
            Self::Max(rule) => rule,
            Self::In(rule) => rule,
        }
    }
}

// ============================================================================
// Syntax Errors
// ============================================================================

/// A rule specification that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RuleSyntaxError {
    /// `len`, `min` or `max` with an argument that is not a base-10 integer
    #[error("invalid validator syntax: '{rule}' expects an integer bound, got {argument:?}")]
    InvalidBound { rule: RuleName, argument: String },
}

// ============================================================================
// Parser
// ============================================================================

/// Parse a rule specification into rules, preserving clause order.
///
/// # Example
///
/// ```
/// use fieldrules::rules::{parse_rules, RuleName};
///
/// let rules = parse_rules("min:2;max:6").unwrap();
/// let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
/// assert_eq!(names, vec![RuleName::Min, RuleName::Max]);
///
/// assert!(parse_rules("len:abc").is_err());
/// ```
pub fn parse_rules(spec: &str) -> Result<Vec<Rule>, RuleSyntaxError> {
    let mut rules = Vec::new();

    for clause in spec.split(';') {
        let (name, argument) = clause.split_once(':').unwrap_or((clause, ""));

        let Some(rule_name) = RuleName::from_clause(name) else {
            continue;
        };

        let rule = match rule_name {
            RuleName::Len => Rule::Len(LenRule::new(parse_bound(rule_name, argument)?)),
            RuleName::Min => Rule::Min(MinRule::new(parse_bound(rule_name, argument)?)),
            RuleName::Max => Rule::Max(MaxRule::new(parse_bound(rule_name, argument)?)),
            RuleName::In => Rule::In(InRule::new(parse_members(argument))),
        };
        rules.push(rule);
    }

    Ok(rules)
}

fn parse_bound(rule: RuleName, argument: &str) -> Result<i64, RuleSyntaxError> {
    argument
        .parse::<i64>()
        .map_err(|_| RuleSyntaxError::InvalidBound {
            rule,
            argument: argument.to_string(),
        })
}

// Tokens are not trimmed individually, only the argument as a whole.
fn parse_members(argument: &str) -> BTreeSet<String> {
    let argument = argument.trim();
    if argument.is_empty() {
        return BTreeSet::new();
    }
    argument.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[Rule]) -> Vec<RuleName> {
        rules.iter().map(Rule::name).collect()
    }

    #[test]
    fn test_parse_single_clauses() {
        assert_eq!(parse_rules("len:3").unwrap(), vec![Rule::Len(LenRule::new(3))]);
        assert_eq!(parse_rules("min:-10").unwrap(), vec![Rule::Min(MinRule::new(-10))]);
        assert_eq!(parse_rules("max:+20").unwrap(), vec![Rule::Max(MaxRule::new(20))]);
    }

    #[test]
    fn test_parse_preserves_clause_order() {
        let rules = parse_rules("max:6;min:2;in:3,4").unwrap();
        assert_eq!(names(&rules), vec![RuleName::Max, RuleName::Min, RuleName::In]);
    }

    #[test]
    fn test_unknown_and_empty_names_are_ignored() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("max4").unwrap().is_empty());
        assert!(parse_rules("regexp:\\d+").unwrap().is_empty());

        let rules = parse_rules(";min:1;").unwrap();
        assert_eq!(names(&rules), vec![RuleName::Min]);
    }

    #[test]
    fn test_bad_bound_rejects_whole_spec() {
        let err = parse_rules("min:1;len:abc;max:4").unwrap_err();
        assert_eq!(
            err,
            RuleSyntaxError::InvalidBound {
                rule: RuleName::Len,
                argument: "abc".to_string(),
            }
        );

        assert!(parse_rules("min:").is_err());
        assert!(parse_rules("max:5-").is_err());
        assert!(parse_rules("len:%12").is_err());
        assert!(parse_rules("len: 3").is_err());
        assert!(parse_rules("len").is_err());
    }

    #[test]
    fn test_parse_membership_set() {
        let rules = parse_rules("in:foo,bar,foo").unwrap();
        let Rule::In(rule) = &rules[0] else {
            panic!("expected membership rule");
        };
        assert_eq!(rule.values().len(), 2);
        assert!(rule.values().contains("foo"));
        assert!(rule.values().contains("bar"));
    }

    #[test]
    fn test_membership_tokens_are_not_trimmed() {
        let rules = parse_rules("in: a, b ").unwrap();
        let Rule::In(rule) = &rules[0] else {
            panic!("expected membership rule");
        };
        assert!(rule.values().contains("a"));
        assert!(rule.values().contains(" b"));
    }

    #[test]
    fn test_empty_membership_set() {
        for spec in ["in:", "in:   ", "in"] {
            let rules = parse_rules(spec).unwrap();
            let Rule::In(rule) = &rules[0] else {
                panic!("expected membership rule for {spec:?}");
            };
            assert!(rule.values().is_empty());
        }
    }

    #[test]
    fn test_argument_split_on_first_colon() {
        let rules = parse_rules("in:a:b,c").unwrap();
        let Rule::In(rule) = &rules[0] else {
            panic!("expected membership rule");
        };
        assert!(rule.values().contains("a:b"));
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_rules("len:abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid validator syntax: 'len' expects an integer bound, got \"abc\""
        );
    }
}

//! Built-in declarative rules
//!
//! These cover the checks a form config file can express. Anything richer
//! belongs in a hand-written [`Schema`].

use super::Schema;
use crate::error::ValidationError;
use crate::state::FieldValue;
use serde::{Deserialize, Serialize};

/// A single declarative check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Rejects null, blank strings and empty lists
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Minimum length of a string (in chars) or list
    MinLength {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Maximum length of a string (in chars) or list
    MaxLength {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Inclusive numeric bounds
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// `local@domain.tld`, checked loosely
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Rule {
    pub fn required() -> Self {
        Rule::Required { message: None }
    }

    pub fn min_length(min: usize) -> Self {
        Rule::MinLength { min, message: None }
    }

    pub fn max_length(max: usize) -> Self {
        Rule::MaxLength { max, message: None }
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Rule::Range {
            min,
            max,
            message: None,
        }
    }

    pub fn email() -> Self {
        Rule::Email { message: None }
    }

    /// Replace the default failure message
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::Range { message, .. }
            | Rule::Email { message } => *message = text,
        }
        self
    }

    fn fail(custom: &Option<String>, default: String) -> Result<(), ValidationError> {
        Err(ValidationError::new(custom.clone().unwrap_or(default)))
    }
}

/// Length of strings and lists; null counts as empty. Other types have no length.
fn length_of(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::Null => Some(0),
        FieldValue::String(s) => Some(s.chars().count()),
        FieldValue::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

impl Schema for Rule {
    fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        match self {
            Rule::Required { message } => {
                let empty = match value {
                    FieldValue::Null => true,
                    FieldValue::String(s) => s.trim().is_empty(),
                    FieldValue::Array(items) => items.is_empty(),
                    _ => false,
                };
                if empty {
                    return Self::fail(message, "must not be empty".to_string());
                }
            }
            Rule::MinLength { min, message } => {
                if length_of(value).is_some_and(|len| len < *min) {
                    return Self::fail(message, format!("must be at least {min} characters"));
                }
            }
            Rule::MaxLength { max, message } => {
                if length_of(value).is_some_and(|len| len > *max) {
                    return Self::fail(message, format!("must be at most {max} characters"));
                }
            }
            Rule::Range { min, max, message } => {
                if value.is_null() {
                    return Ok(());
                }
                let Some(n) = value.as_f64() else {
                    return Self::fail(message, "must be a number".to_string());
                };
                if let Some(min) = min.filter(|min| n < *min) {
                    return Self::fail(message, format!("must be at least {min}"));
                }
                if let Some(max) = max.filter(|max| n > *max) {
                    return Self::fail(message, format!("must be at most {max}"));
                }
            }
            Rule::Email { message } => match value {
                FieldValue::Null => {}
                FieldValue::String(s) if s.is_empty() || is_email(s) => {}
                _ => return Self::fail(message, "must be a valid email address".to_string()),
            },
        }
        Ok(())
    }
}

/// Rules applied in order; the first failure wins
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(pub Vec<Rule>);

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet(rules)
    }
}

impl Schema for RuleSet {
    fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        self.0.iter().try_for_each(|rule| rule.validate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn message(result: Result<(), ValidationError>) -> Option<String> {
        result.err().map(|e| e.message)
    }

    mod required {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_rejects_empty_values() {
            let rule = Rule::required();
            for value in [json!(null), json!(""), json!("   "), json!([])] {
                assert_eq!(
                    message(rule.validate(&value)),
                    Some("must not be empty".to_string())
                );
            }
        }

        #[test]
        fn test_accepts_present_values() {
            let rule = Rule::required();
            for value in [json!("x"), json!(0), json!(false), json!([1])] {
                assert!(rule.validate(&value).is_ok());
            }
        }

        #[test]
        fn test_custom_message() {
            let rule = Rule::required().with_message("email is required");
            assert_eq!(
                message(rule.validate(&json!(""))),
                Some("email is required".to_string())
            );
        }
    }

    mod lengths {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_min_length_counts_chars() {
            let rule = Rule::min_length(3);
            assert!(rule.validate(&json!("äöü")).is_ok());
            assert_eq!(
                message(rule.validate(&json!("ab"))),
                Some("must be at least 3 characters".to_string())
            );
        }

        #[test]
        fn test_max_length_applies_to_lists() {
            let rule = Rule::max_length(2);
            assert!(rule.validate(&json!([1, 2])).is_ok());
            assert!(rule.validate(&json!([1, 2, 3])).is_err());
        }

        #[test]
        fn test_lengths_ignore_numbers() {
            assert!(Rule::min_length(5).validate(&json!(1)).is_ok());
        }
    }

    mod range {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_bounds_are_inclusive() {
            let rule = Rule::range(Some(18.0), Some(120.0));
            assert!(rule.validate(&json!(18)).is_ok());
            assert!(rule.validate(&json!(120)).is_ok());
            assert_eq!(
                message(rule.validate(&json!(17))),
                Some("must be at least 18".to_string())
            );
            assert_eq!(
                message(rule.validate(&json!(121.5))),
                Some("must be at most 120".to_string())
            );
        }

        #[test]
        fn test_rejects_non_numbers() {
            let rule = Rule::range(Some(0.0), None);
            assert_eq!(
                message(rule.validate(&json!("ten"))),
                Some("must be a number".to_string())
            );
            assert!(rule.validate(&json!(null)).is_ok());
        }
    }

    mod email {
        use super::*;

        #[test]
        fn test_accepts_plain_addresses() {
            assert!(Rule::email().validate(&json!("a@b.com")).is_ok());
            assert!(Rule::email().validate(&json!("")).is_ok());
        }

        #[test]
        fn test_rejects_malformed_addresses() {
            for value in ["a", "@b.com", "a@b", "a@.com", "a@b.", "a b@c.com", "a@b@c.com"] {
                assert!(
                    Rule::email().validate(&json!(value)).is_err(),
                    "{value} should be rejected"
                );
            }
        }
    }

    mod rule_set {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_first_failure_wins() {
            let rules = RuleSet(vec![Rule::required(), Rule::email()]);
            assert_eq!(
                message(rules.validate(&json!(""))),
                Some("must not be empty".to_string())
            );
            assert_eq!(
                message(rules.validate(&json!("nope"))),
                Some("must be a valid email address".to_string())
            );
            assert!(rules.validate(&json!("a@b.com")).is_ok());
        }

        #[test]
        fn test_empty_set_accepts_everything() {
            assert!(RuleSet::default().validate(&json!(null)).is_ok());
        }

        #[test]
        fn test_deserialize_from_config_json() {
            let json = r#"[
                {"rule": "required"},
                {"rule": "min_length", "min": 3, "message": "too short"}
            ]"#;
            let rules: RuleSet = serde_json::from_str(json).unwrap();
            assert_eq!(
                rules,
                RuleSet(vec![
                    Rule::required(),
                    Rule::min_length(3).with_message("too short")
                ])
            );
        }
    }
}

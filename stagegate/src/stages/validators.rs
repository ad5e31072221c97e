//! Validation predicates over raw widget values.

use regex::Regex;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::LazyLock;

/// A pure predicate over the raw value of a widget.
///
/// Validators never fail: a value is either accepted or not.
pub trait Validator: Send + Sync + Debug {
    /// Returns the name of the validator, for logs.
    fn name(&self) -> &str;

    /// Returns true if `value` satisfies the stage.
    fn validate(&self, value: &str) -> bool;
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl Validator for AnyValue {
    fn name(&self) -> &str {
        "any"
    }

    fn validate(&self, _value: &str) -> bool {
        true
    }
}

/// Accepts any value with at least one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmpty;

impl Validator for NonEmpty {
    fn name(&self) -> &str {
        "non_empty"
    }

    fn validate(&self, value: &str) -> bool {
        !value.is_empty()
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is a valid regex")
});

/// Accepts values matching a regular expression.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    name: String,
    pattern: Regex,
}

impl PatternValidator {
    /// Compiles a new pattern validator.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` does not compile.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
        })
    }

    /// The email address pattern used by the signup form.
    #[must_use]
    pub fn email() -> Self {
        Self {
            name: "email".to_string(),
            pattern: EMAIL_PATTERN.clone(),
        }
    }
}

impl Validator for PatternValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}

/// Accepts exactly one answer.
#[derive(Debug, Clone)]
pub struct ExactMatch {
    expected: String,
    case_sensitive: bool,
}

impl ExactMatch {
    /// Case-sensitive exact match.
    #[must_use]
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            case_sensitive: true,
        }
    }

    /// Exact match ignoring case.
    #[must_use]
    pub fn ignore_case(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            case_sensitive: false,
        }
    }
}

impl Validator for ExactMatch {
    fn name(&self) -> &str {
        "exact_match"
    }

    fn validate(&self, value: &str) -> bool {
        if self.case_sensitive {
            value == self.expected
        } else {
            value.to_lowercase() == self.expected.to_lowercase()
        }
    }
}

/// Accepts everything except a fixed set of trick answers.
#[derive(Debug, Clone, Default)]
pub struct ExcludeValues {
    rejected: HashSet<String>,
}

impl ExcludeValues {
    /// Creates a validator rejecting every value in `rejected`.
    #[must_use]
    pub fn new(rejected: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            rejected: rejected.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for ExcludeValues {
    fn name(&self) -> &str {
        "exclude_values"
    }

    fn validate(&self, value: &str) -> bool {
        !self.rejected.contains(value)
    }
}

/// A closure-based validator.
pub struct FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    /// Creates a new closure-based validator.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &str) -> bool {
        (self.func)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert!(NonEmpty.validate("alice"));
        assert!(NonEmpty.validate(" "));
        assert!(!NonEmpty.validate(""));
    }

    #[test]
    fn test_email_accepts_plain_addresses() {
        let email = PatternValidator::email();
        assert!(email.validate("alice@example.com"));
        assert!(email.validate("first.last@sub.example.org"));
        assert!(email.validate("\"quoted name\"@example.com"));
        assert!(email.validate("bob@[192.168.0.1]"));
    }

    #[test]
    fn test_email_rejects_malformed_addresses() {
        let email = PatternValidator::email();
        assert!(!email.validate("not-an-email"));
        assert!(!email.validate("alice@"));
        assert!(!email.validate("alice@example"));
        assert!(!email.validate("alice@example.c"));
        assert!(!email.validate("al ice@example.com"));
        assert!(!email.validate(".alice@example.com"));
    }

    #[test]
    fn test_pattern_validator_rejects_bad_regex() {
        assert!(PatternValidator::new("broken", "(").is_err());
        let digits = PatternValidator::new("digits", r"^\d+$").unwrap();
        assert_eq!(digits.name(), "digits");
        assert!(digits.validate("42"));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let answer = ExactMatch::new("21");
        assert!(answer.validate("21"));
        assert!(!answer.validate("twenty-one"));
        assert!(!answer.validate(" 21"));

        let word = ExactMatch::new("Red");
        assert!(!word.validate("red"));
        assert!(ExactMatch::ignore_case("Red").validate("red"));
    }

    #[test]
    fn test_exclude_values() {
        let gamble = ExcludeValues::new(["gambling is bad"]);
        assert!(gamble.validate("Red"));
        assert!(gamble.validate("Black"));
        assert!(!gamble.validate("gambling is bad"));
    }

    #[test]
    fn test_fn_validator() {
        let even = FnValidator::new("even_length", |v: &str| v.len() % 2 == 0);
        assert_eq!(even.name(), "even_length");
        assert!(even.validate("ab"));
        assert!(!even.validate("abc"));
        assert!(AnyValue.validate(""));
    }
}

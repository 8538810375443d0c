//! The asymmetric matcher.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// A predicate usable wherever a literal argument is expected.
///
/// Matchers are immutable. Clones share the predicate.
#[derive(Clone)]
pub struct Matcher {
    predicate:   Rc<dyn Fn(&Value) -> bool>,
    description: String,
    expected:    Option<Value>,
}

impl Matcher {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self {
            predicate:   Rc::new(predicate),
            description: description.into(),
            expected:    None,
        }
    }

    /// Attach the value this matcher compares against, for diagnostics.
    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn asymmetric_match(&self, actual: &Value) -> bool { (self.predicate)(actual) }

    pub fn description(&self) -> &str { &self.description }

    pub fn expected(&self) -> Option<&Value> { self.expected.as_ref() }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(f, "{}({})", self.description, expected),
            None => write!(f, "{}", self.description),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predicate_is_consulted() {
        let number = Matcher::new("number", Value::is_number);
        assert!(number.asymmetric_match(&json!(1)));
        assert!(number.asymmetric_match(&json!(-2.5)));
        assert!(!number.asymmetric_match(&json!("1")));
        assert!(!number.asymmetric_match(&Value::Null));
    }

    #[test]
    fn test_display_includes_expected() {
        let m = Matcher::new("greaterThan", |v| v.as_i64().is_some_and(|n| n > 3))
            .with_expected(json!(3));
        assert_eq!(m.to_string(), "greaterThan(3)");
        assert_eq!(m.expected(), Some(&json!(3)));
        assert_eq!(Matcher::new("any", |_| true).to_string(), "any");
    }
}

//! Positional argument patterns.

use std::fmt;

use serde_json::{Number, Value};

use crate::error::{MatcherError, Result};
use crate::matcher::Matcher;

/// Tag carried by serialized matchers of the Jest `expect` ecosystem.
const JEST_MATCHER_TAG: &str = "Symbol.for(jest.asymmetricMatcher)";
const TYPEOF_KEY: &str = "$$typeof";
const ASYMMETRIC_MATCH_KEY: &str = "asymmetricMatch";

/// A matcher from another ecosystem. It can be described but never delegated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignMatcher {
    ecosystem:   String,
    description: String,
}

impl ForeignMatcher {
    pub fn new(ecosystem: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ecosystem:   ecosystem.into(),
            description: description.into(),
        }
    }

    pub fn ecosystem(&self) -> &str { &self.ecosystem }

    pub fn description(&self) -> &str { &self.description }

    /// Recognize a JSON object shaped like a serialized foreign matcher.
    pub fn detect(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if let Some(tag) = object.get(TYPEOF_KEY).and_then(Value::as_str) {
            if tag == JEST_MATCHER_TAG {
                return Some(Self::new("jest", describe_object(object)));
            }
        }
        if object.contains_key(ASYMMETRIC_MATCH_KEY) {
            return Some(Self::new("unknown", describe_object(object)));
        }
        None
    }
}

fn describe_object(object: &serde_json::Map<String, Value>) -> String {
    object
        .get("name")
        .or_else(|| object.get("toAsymmetricMatcher"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Value::Object(object.clone()).to_string())
}

/// A loosely typed pattern argument, as supplied by callers.
///
/// Converting a list of these into an [`ArgPattern`] is where foreign
/// matchers get rejected.
#[derive(Debug, Clone)]
pub enum Arg {
    Literal(Value),
    Matcher(Matcher),
    Foreign(ForeignMatcher),
}

impl Arg {
    /// Classify a raw JSON value, recognizing serialized foreign matchers.
    pub fn from_value(value: Value) -> Self {
        match ForeignMatcher::detect(&value) {
            Some(foreign) => Arg::Foreign(foreign),
            None => Arg::Literal(value),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self { Arg::from_value(value) }
}

impl From<Matcher> for Arg {
    fn from(matcher: Matcher) -> Self { Arg::Matcher(matcher) }
}

impl From<ForeignMatcher> for Arg {
    fn from(foreign: ForeignMatcher) -> Self { Arg::Foreign(foreign) }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self { Arg::Literal(Value::from(value)) }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, u64, f64, &str, String);

/// One position of an [`ArgPattern`].
#[derive(Debug, Clone)]
pub enum PatternEntry {
    Literal(Value),
    Matcher(Matcher),
}

impl PatternEntry {
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            PatternEntry::Literal(expected) => strict_equals(expected, actual),
            PatternEntry::Matcher(matcher) => matcher.asymmetric_match(actual),
        }
    }
}

impl fmt::Display for PatternEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternEntry::Literal(value) => write!(f, "{}", value),
            PatternEntry::Matcher(matcher) => write!(f, "<{}>", matcher),
        }
    }
}

/// Validated positional pattern.
///
/// Only the first `len()` actual arguments take part in matching; an actual
/// argument missing at a pattern position is seen as `Value::Null`.
#[derive(Debug, Clone, Default)]
pub struct ArgPattern {
    entries: Vec<PatternEntry>,
}

impl ArgPattern {
    /// Validate loose arguments into a pattern.
    pub fn try_new<I, A>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let entries = args
            .into_iter()
            .enumerate()
            .map(|(position, arg)| match arg.into() {
                Arg::Literal(value) => Ok(PatternEntry::Literal(value)),
                Arg::Matcher(matcher) => Ok(PatternEntry::Matcher(matcher)),
                Arg::Foreign(foreign) => Err(MatcherError::UnsupportedMatcher {
                    position,
                    ecosystem: foreign.ecosystem,
                    description: foreign.description,
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PatternEntry] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn matches(&self, actual: &[Value]) -> bool {
        self.entries.iter().enumerate().all(|(i, entry)| {
            let actual = actual.get(i).unwrap_or(&Value::Null);
            entry.matches(actual)
        })
    }
}

impl fmt::Display for ArgPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, ")")
    }
}

/// Strict equality over JSON values.
///
/// Structural, except that numbers compare by numeric value so `5` and `5.0`
/// are equal.
pub fn strict_equals(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| strict_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| strict_equals(x, y)))
        }
        _ => expected == actual,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    if a.is_f64() || b.is_f64() {
        return matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y);
    }
    false
}

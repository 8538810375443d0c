//! Argument patterns and the asymmetric matcher protocol.
//!
//! A pattern is a positional list of [`PatternEntry`] values. Each entry is
//! either a literal, compared with [`strict_equals`], or a [`Matcher`], asked
//! through [`Matcher::asymmetric_match`].
//!
//! Patterns are built from loose [`Arg`] values. That conversion is the only
//! place foreign matchers are recognized, and they are rejected there with
//! [`MatcherError::UnsupportedMatcher`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use understudy_matcher::{Arg, ArgPattern, Matcher};
//!
//! let number = Matcher::new("number", |v| v.is_number());
//! let pattern = ArgPattern::try_new([Arg::from(number), Arg::from("x")]).unwrap();
//!
//! assert!(pattern.matches(&[json!(5), json!("x")]));
//! assert!(!pattern.matches(&[json!("5"), json!("x")]));
//! ```

pub use error::{MatcherError, Result};
pub use matcher::Matcher;
pub use pattern::{Arg, ArgPattern, ForeignMatcher, PatternEntry, strict_equals};

mod error;
mod matcher;
mod pattern;

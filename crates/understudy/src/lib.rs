//! Argument-aware mock functions and lazily built deep mocks.
//!
//! # Architecture
//!
//! - [`MockFn`]: the recording mock-function primitive.
//! - [`Matcher`] and [`ArgPattern`]: what a call's arguments are compared against.
//! - [`CallRouter`]: a mock function whose behavior depends on its arguments.
//! - [`DeepMock`] and [`DeepFn`]: a lazily discovered tree of routers.
//!
//! # Example
//!
//! ```
//! use serde_json::{Value, json};
//! use understudy::prelude::*;
//!
//! let client = mock_deep(DeepMockOptions::new());
//! let get = client.prop("users").unwrap().method("get").unwrap();
//!
//! get.called_with([Matcher::new("number", Value::is_number)])
//!     .unwrap()
//!     .returns(json!({ "name": "ada" }));
//!
//! assert_eq!(get.call(&[json!(1)]).unwrap(), json!({ "name": "ada" }));
//! assert_eq!(get.call(&[json!("1")]).unwrap(), Value::Null);
//! ```

pub use understudy_deep::{
    DeepFn, DeepMock, DeepMockConfig, DeepMockError, DeepMockOptions, SlotKind, UnmatchedPolicy,
};
pub use understudy_fn::{CallError, CallOutcome, CallResult, Implementation, MockFn, implementation};
pub use understudy_matcher::{
    Arg, ArgPattern, ForeignMatcher, Matcher, MatcherError, PatternEntry, strict_equals,
};
pub use understudy_router::{Binding, CallRouter, Ownership, RouterError, RouterState};

use serde_json::Value;

pub mod prelude {
    pub use crate::{
        CallError, CallRouter, DeepFn, DeepMock, DeepMockOptions, Matcher, MockFn, implementation, mock,
        mock_deep, mock_fn, mock_fn_with_fallback, mock_with,
    };
}

/// A standalone router; unmatched calls return `null`.
pub fn mock_fn() -> CallRouter { CallRouter::new() }

/// A standalone router; unmatched calls go to `fallback`.
pub fn mock_fn_with_fallback(fallback: Implementation) -> CallRouter { CallRouter::with_fallback(fallback) }

/// A shallow mock: every member is a function.
pub fn mock() -> DeepMock { DeepMock::build(DeepMockOptions::new().shallow()) }

/// A shallow mock with some members preset to plain values.
pub fn mock_with<I, K>(values: I) -> Result<DeepMock, DeepMockError>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let root = mock();
    for (key, value) in values {
        root.set(key.as_ref(), value)?;
    }
    Ok(root)
}

/// A deep mock built with `options`.
pub fn mock_deep(options: DeepMockOptions) -> DeepMock { DeepMock::build(options) }

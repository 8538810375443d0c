//! Argument-pattern call routing.
//!
//! A [`CallRouter`] wraps a [`MockFn`](understudy_fn::MockFn) and keeps a
//! newest-first stack of bindings, each pairing an
//! [`ArgPattern`](understudy_matcher::ArgPattern) with its own delegate mock.
//! A call runs the delegate of the first binding whose pattern matches, or the
//! router's fallback when none does.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use understudy_router::CallRouter;
//!
//! let add = CallRouter::new();
//! add.called_with([1, 2]).unwrap().returns(json!(3));
//!
//! assert_eq!(add.call(&[json!(1), json!(2)]).unwrap(), json!(3));
//! assert_eq!(add.call(&[json!(2), json!(2)]).unwrap(), json!(null));
//! assert_eq!(add.call_count(), 2);
//! ```

pub use error::{Result, RouterError};
pub use router::{Binding, CallRouter, Ownership, RouterState};

mod error;
mod router;

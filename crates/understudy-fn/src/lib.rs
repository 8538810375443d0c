//! Recording mock-function primitive.
//!
//! A [`MockFn`] is a cheaply clonable handle to a callable that records every
//! invocation and delegates to a replaceable [`Implementation`]. It is the
//! building block the call router and the deep mock tree sit on top of.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use understudy_fn::MockFn;
//!
//! let f = MockFn::new();
//! f.returns(json!(42));
//!
//! assert_eq!(f.call(&[json!("x")]).unwrap(), json!(42));
//! assert_eq!(f.calls(), vec![vec![json!("x")]]);
//! ```

pub use error::{CallError, CallResult};
pub use mock_fn::{CallOutcome, Implementation, MockFn, implementation};

mod error;
mod mock_fn;

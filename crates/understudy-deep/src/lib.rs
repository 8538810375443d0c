//! Deep mocks: lazily built trees of call routers.
//!
//! A [`DeepMock`] node discovers its shape on first touch. Asking for a
//! [`method`](DeepMock::method) materializes a [`DeepFn`] backed by a
//! [`CallRouter`](understudy_router::CallRouter); asking for a
//! [`prop`](DeepMock::prop) materializes a nested node. Either way the child is
//! cached, so the same path always yields the same instance.
//!
//! With [`func_prop_support`](DeepMockOptions::func_prop_support) a function
//! member also carries nested properties of its own.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use understudy_deep::{DeepMock, DeepMockOptions};
//!
//! let root = DeepMock::build(DeepMockOptions::new().func_prop_support(true));
//! let a = root.method("a").unwrap();
//! a.called_with([1]).unwrap().returns(json!(3));
//! a.method("b").unwrap().called_with([1]).unwrap().returns(json!(4));
//!
//! assert_eq!(root.method("a").unwrap().call(&[json!(1)]).unwrap(), json!(3));
//! assert_eq!(root.prop("a").unwrap().method("b").unwrap().call(&[json!(1)]).unwrap(), json!(4));
//! ```

pub use error::{DeepMockError, Result};
pub use member::DeepFn;
pub use node::{DeepMock, SlotKind};
pub use options::{DeepMockConfig, DeepMockOptions, UnmatchedPolicy};

mod error;
mod member;
mod node;
mod options;

//! Function members of a deep mock tree.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use serde_json::Value;
use tracing::debug;
use understudy_fn::{CallOutcome, CallResult, MockFn};
use understudy_matcher::{Arg, ArgPattern};
use understudy_router::CallRouter;

use crate::error::{DeepMockError, Result};
use crate::node::{DeepMock, TreeContext};

/// A callable member of a deep mock.
///
/// Calls go through a tree-owned [`CallRouter`]. Under `func_prop_support` the
/// member also has a property view, created on first property access.
#[derive(Clone)]
pub struct DeepFn {
    inner: Rc<FnInner>,
}

struct FnInner {
    router: CallRouter,
    props:  OnceCell<DeepMock>,
    path:   String,
    tree:   Rc<TreeContext>,
}

impl DeepFn {
    pub(crate) fn new(path: String, tree: Rc<TreeContext>) -> Self {
        Self {
            inner: Rc::new(FnInner {
                router: CallRouter::in_tree(path.clone(), tree.fallback()),
                props: OnceCell::new(),
                path,
                tree,
            }),
        }
    }

    pub fn path(&self) -> &str { &self.inner.path }

    /// The router answering calls to this member.
    ///
    /// Its `clear` and `reset` are refused like the member's own.
    pub fn router(&self) -> &CallRouter { &self.inner.router }

    pub fn call(&self, args: &[Value]) -> CallResult { self.inner.router.call(args) }

    /// Configure behavior for calls matching `args`. See
    /// [`CallRouter::called_with`].
    pub fn called_with<I, A>(&self, args: I) -> Result<MockFn>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Ok(self.inner.router.called_with(args)?)
    }

    pub fn called_with_pattern(&self, pattern: ArgPattern) -> MockFn {
        self.inner.router.called_with_pattern(pattern)
    }

    pub fn calls(&self) -> Vec<Vec<Value>> { self.inner.router.calls() }

    pub fn call_count(&self) -> usize { self.inner.router.call_count() }

    pub fn results(&self) -> Vec<CallOutcome> { self.inner.router.results() }

    pub fn binding_count(&self) -> usize { self.inner.router.binding_count() }

    /// The property view of this member.
    pub fn props(&self) -> Result<DeepMock> {
        if !self.inner.tree.func_prop_support() {
            return Err(DeepMockError::FuncPropsDisabled {
                path: self.inner.path.clone(),
            });
        }
        let node = self.inner.props.get_or_init(|| {
            debug!(path = %self.inner.path, "materialized property view of function member");
            DeepMock::node(self.inner.path.clone(), Rc::clone(&self.inner.tree))
        });
        Ok(node.clone())
    }

    /// Object-shaped access on the property view.
    pub fn prop(&self, key: &str) -> Result<DeepMock> { self.props()?.prop(key) }

    /// Function-shaped access on the property view.
    pub fn method(&self, key: &str) -> Result<DeepFn> { self.props()?.method(key) }

    /// Always fails: members of a deep mock cannot be cleared in place.
    pub fn clear(&self) -> Result<()> { Ok(self.inner.router.clear()?) }

    /// Always fails: members of a deep mock cannot be reset in place.
    pub fn reset(&self) -> Result<()> { Ok(self.inner.router.reset()?) }

    /// Whether both handles refer to the same member.
    pub fn ptr_eq(&self, other: &DeepFn) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

impl fmt::Debug for DeepFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepFn")
            .field("path", &self.inner.path)
            .field("bindings", &self.binding_count())
            .field("has_props", &self.inner.props.get().is_some())
            .finish()
    }
}

//! The call router and its binding stack.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace, warn};
use understudy_fn::{CallOutcome, CallResult, Implementation, MockFn, implementation};
use understudy_matcher::{Arg, ArgPattern};

use crate::error::{Result, RouterError};

/// Whether the dispatcher has been installed into the underlying mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Unwired,
    Wired,
}

/// Who may clear or reset a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    Standalone,
    /// Materialized by a deep mock at `path`.
    Tree { path: String },
}

/// An argument pattern and the delegate that answers calls matching it.
#[derive(Debug, Clone)]
pub struct Binding {
    pattern:  ArgPattern,
    delegate: MockFn,
}

impl Binding {
    pub fn pattern(&self) -> &ArgPattern { &self.pattern }

    pub fn delegate(&self) -> &MockFn { &self.delegate }
}

type BindingStack = Rc<RefCell<VecDeque<Binding>>>;

/// A mock function that picks its behavior from the call's arguments.
///
/// Clones are handles to the same router.
#[derive(Clone)]
pub struct CallRouter {
    inner: Rc<RouterInner>,
}

struct RouterInner {
    mock:      MockFn,
    // Shared with the installed dispatcher so renames reach its traces.
    name:      Rc<RefCell<String>>,
    bindings:  BindingStack,
    fallback:  Option<Implementation>,
    state:     Cell<RouterState>,
    ownership: Ownership,
}

impl Default for CallRouter {
    fn default() -> Self { Self::new() }
}

impl CallRouter {
    /// A router whose unmatched calls return `Value::Null`.
    pub fn new() -> Self { Self::build(None, Ownership::Standalone) }

    /// A router whose unmatched calls go to `fallback`.
    pub fn with_fallback(fallback: Implementation) -> Self { Self::build(Some(fallback), Ownership::Standalone) }

    /// A router owned by a deep mock at `path`. Clear and reset are refused.
    pub fn in_tree(path: impl Into<String>, fallback: Option<Implementation>) -> Self {
        let path = path.into();
        let router = Self::build(fallback, Ownership::Tree { path: path.clone() });
        router.rename(path);
        router
    }

    fn build(fallback: Option<Implementation>, ownership: Ownership) -> Self {
        let mock = match &fallback {
            Some(f) => MockFn::with_implementation(Rc::clone(f)),
            None => MockFn::new(),
        };
        let name = Rc::new(RefCell::new(mock.name()));
        Self {
            inner: Rc::new(RouterInner {
                mock,
                name,
                bindings: Rc::new(RefCell::new(VecDeque::new())),
                fallback,
                state: Cell::new(RouterState::Unwired),
                ownership,
            }),
        }
    }

    /// Set the name used in diagnostics and delegate names.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.rename(name);
        self
    }

    fn rename(&self, name: impl Into<String>) {
        let name = name.into();
        self.inner.mock.set_name(name.clone());
        *self.inner.name.borrow_mut() = name;
    }

    pub fn name(&self) -> String { self.inner.name.borrow().clone() }

    /// Configure behavior for calls matching `args`.
    ///
    /// Returns the delegate for this pattern; configure it like any other
    /// [`MockFn`]. A foreign matcher anywhere in `args` is rejected before the
    /// binding stack is touched.
    pub fn called_with<I, A>(&self, args: I) -> Result<MockFn>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let pattern = ArgPattern::try_new(args).map_err(|err| {
            warn!(router = %self.name(), error = %err, "rejected argument pattern");
            RouterError::from(err)
        })?;
        Ok(self.called_with_pattern(pattern))
    }

    /// Configure behavior for an already validated pattern.
    pub fn called_with_pattern(&self, pattern: ArgPattern) -> MockFn {
        let delegate = MockFn::new().named(format!("{}{}", self.name(), pattern));
        debug!(router = %self.name(), %pattern, "registered argument binding");

        self.inner.bindings.borrow_mut().push_front(Binding {
            pattern,
            delegate: delegate.clone(),
        });
        if self.inner.state.get() == RouterState::Unwired {
            self.wire();
        }
        delegate
    }

    fn wire(&self) {
        let bindings = Rc::clone(&self.inner.bindings);
        let fallback = self.inner.fallback.clone();
        let name = Rc::clone(&self.inner.name);
        self.inner
            .mock
            .set_implementation(implementation(move |args| dispatch(&name, &bindings, fallback.as_ref(), args)));
        self.inner.state.set(RouterState::Wired);
        trace!(router = %self.name(), "dispatcher installed");
    }

    /// Invoke the router. The call is recorded on the router itself and on
    /// whichever delegate answers it.
    pub fn call(&self, args: &[Value]) -> CallResult { self.inner.mock.call(args) }

    pub fn calls(&self) -> Vec<Vec<Value>> { self.inner.mock.calls() }

    pub fn call_count(&self) -> usize { self.inner.mock.call_count() }

    pub fn last_call(&self) -> Option<Vec<Value>> { self.inner.mock.last_call() }

    pub fn results(&self) -> Vec<CallOutcome> { self.inner.mock.results() }

    pub fn binding_count(&self) -> usize { self.inner.bindings.borrow().len() }

    /// Snapshot of the binding stack, newest first.
    pub fn bindings(&self) -> Vec<Binding> { self.inner.bindings.borrow().iter().cloned().collect() }

    pub fn state(&self) -> RouterState { self.inner.state.get() }

    pub fn ownership(&self) -> &Ownership { &self.inner.ownership }

    /// Forget the router's own call history. Bindings stay in place.
    pub fn clear(&self) -> Result<()> {
        self.ensure_standalone("clear")?;
        self.inner.mock.clear();
        Ok(())
    }

    /// Drop every binding and the call history, and uninstall the dispatcher.
    pub fn reset(&self) -> Result<()> {
        self.ensure_standalone("reset")?;
        self.inner.bindings.borrow_mut().clear();
        self.inner.mock.reset();
        self.inner.state.set(RouterState::Unwired);
        debug!(router = %self.name(), "router reset");
        Ok(())
    }

    fn ensure_standalone(&self, operation: &'static str) -> Result<()> {
        match &self.inner.ownership {
            Ownership::Standalone => Ok(()),
            Ownership::Tree { path } => {
                warn!(router = %path, operation, "lifecycle operation refused on deep mock member");
                Err(RouterError::LifecycleRestriction {
                    operation,
                    path: path.clone(),
                })
            }
        }
    }

    /// Whether both handles refer to the same router.
    pub fn ptr_eq(&self, other: &CallRouter) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

fn dispatch(
    name: &RefCell<String>,
    bindings: &RefCell<VecDeque<Binding>>,
    fallback: Option<&Implementation>,
    args: &[Value],
) -> CallResult {
    // Matchers and delegates are user code; never hold the borrow across them.
    let stack: Vec<Binding> = bindings.borrow().iter().cloned().collect();

    match stack.iter().position(|binding| binding.pattern.matches(args)) {
        Some(index) => {
            let binding = &stack[index];
            trace!(router = %name.borrow(), pattern = %binding.pattern, index, "call matched binding");
            binding.delegate.call(args)
        }
        None => match fallback {
            Some(fallback) => {
                trace!(router = %name.borrow(), "no binding matched, using fallback");
                fallback(args)
            }
            None => {
                trace!(router = %name.borrow(), "no binding matched");
                Ok(Value::Null)
            }
        },
    }
}

impl fmt::Debug for CallRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRouter")
            .field("name", &self.name())
            .field("state", &self.state())
            .field("bindings", &self.binding_count())
            .field("ownership", &self.inner.ownership)
            .finish()
    }
}

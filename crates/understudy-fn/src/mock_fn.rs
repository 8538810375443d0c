//! The mock-function handle and its call history.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CallError, CallResult};

/// Behavior installed into a [`MockFn`].
pub type Implementation = Rc<dyn Fn(&[Value]) -> CallResult>;

/// Wrap a closure as an [`Implementation`].
pub fn implementation<F>(f: F) -> Implementation
where
    F: Fn(&[Value]) -> CallResult + 'static,
{
    Rc::new(f)
}

/// Outcome of one recorded invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallOutcome {
    /// The call has started but not returned yet (re-entrant calls).
    Incomplete,
    Return(Value),
    Throw(String),
}

/// Clonable handle to a recording callable.
///
/// Clones share state: configuring one clone configures them all.
#[derive(Clone)]
pub struct MockFn {
    inner: Rc<RefCell<State>>,
}

struct State {
    name:           String,
    base:           Option<Implementation>,
    implementation: Option<Implementation>,
    once:           VecDeque<Implementation>,
    calls:          Vec<Vec<Value>>,
    results:        Vec<CallOutcome>,
    // Bumped by `clear`/`reset` so in-flight calls don't write into a new history.
    epoch:          u64,
}

impl Default for MockFn {
    fn default() -> Self { Self::new() }
}

impl MockFn {
    /// A mock with no implementation; every call returns `Value::Null`.
    pub fn new() -> Self { Self::from_base(None) }

    /// A mock whose base implementation is `base`.
    ///
    /// The base implementation is what [`reset`](Self::reset) restores.
    pub fn with_implementation(base: Implementation) -> Self { Self::from_base(Some(base)) }

    fn from_base(base: Option<Implementation>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(State {
                name: String::from("mock"),
                implementation: base.clone(),
                base,
                once: VecDeque::new(),
                calls: Vec::new(),
                results: Vec::new(),
                epoch: 0,
            })),
        }
    }

    /// Set the name reported in diagnostics.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&self, name: impl Into<String>) { self.inner.borrow_mut().name = name.into(); }

    pub fn name(&self) -> String { self.inner.borrow().name.clone() }

    /// Invoke the mock.
    ///
    /// The arguments are recorded before the implementation runs, so the
    /// implementation may inspect or re-enter the mock.
    pub fn call(&self, args: &[Value]) -> CallResult {
        let (index, epoch, implementation) = {
            let mut state = self.inner.borrow_mut();
            state.calls.push(args.to_vec());
            state.results.push(CallOutcome::Incomplete);
            let implementation = match state.once.pop_front() {
                Some(once) => Some(once),
                None => state.implementation.clone(),
            };
            (state.results.len() - 1, state.epoch, implementation)
        };

        let result = match implementation {
            Some(f) => f(args),
            None => Ok(Value::Null),
        };

        let outcome = match &result {
            Ok(value) => CallOutcome::Return(value.clone()),
            Err(CallError::Thrown(message)) => CallOutcome::Throw(message.clone()),
        };
        let mut state = self.inner.borrow_mut();
        if state.epoch == epoch {
            if let Some(slot) = state.results.get_mut(index) {
                *slot = outcome;
            }
        }
        result
    }

    /// Replace the persistent implementation.
    pub fn set_implementation(&self, f: Implementation) { self.inner.borrow_mut().implementation = Some(f); }

    /// The currently installed persistent implementation, if any.
    pub fn implementation(&self) -> Option<Implementation> { self.inner.borrow().implementation.clone() }

    /// Queue an implementation used for exactly one call.
    ///
    /// Queued implementations run in FIFO order before the persistent one.
    pub fn set_implementation_once(&self, f: Implementation) { self.inner.borrow_mut().once.push_back(f); }

    /// Always return `value`.
    pub fn returns(&self, value: Value) {
        self.set_implementation(implementation(move |_| Ok(value.clone())));
    }

    /// Return `value` for the next call only.
    pub fn returns_once(&self, value: Value) {
        self.set_implementation_once(implementation(move |_| Ok(value.clone())));
    }

    /// Always fail with `message`.
    pub fn throws(&self, message: impl Into<String>) {
        let message = message.into();
        self.set_implementation(implementation(move |_| Err(CallError::thrown(message.clone()))));
    }

    /// Arguments of every call so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Value>> { self.inner.borrow().calls.clone() }

    pub fn call_count(&self) -> usize { self.inner.borrow().calls.len() }

    pub fn last_call(&self) -> Option<Vec<Value>> { self.inner.borrow().calls.last().cloned() }

    /// Outcome of every call so far, oldest first.
    pub fn results(&self) -> Vec<CallOutcome> { self.inner.borrow().results.clone() }

    /// Forget recorded calls and results. Implementations are kept.
    pub fn clear(&self) {
        let mut state = self.inner.borrow_mut();
        state.calls.clear();
        state.results.clear();
        state.epoch += 1;
    }

    /// Forget history and queued implementations, and restore the base
    /// implementation.
    pub fn reset(&self) {
        let mut state = self.inner.borrow_mut();
        state.calls.clear();
        state.results.clear();
        state.once.clear();
        state.implementation = state.base.clone();
        state.epoch += 1;
    }

    /// Whether both handles refer to the same mock.
    pub fn ptr_eq(&self, other: &MockFn) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

impl fmt::Debug for MockFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MockFn")
            .field("name", &state.name)
            .field("calls", &state.calls.len())
            .field("has_implementation", &state.implementation.is_some())
            .field("queued", &state.once.len())
            .finish()
    }
}

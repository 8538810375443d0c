//! Object nodes of a deep mock tree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};
use understudy_fn::Implementation;

use crate::error::{DeepMockError, Result};
use crate::member::DeepFn;
use crate::options::DeepMockOptions;

/// Settings shared by every node of one tree.
pub(crate) struct TreeContext {
    pub(crate) options: DeepMockOptions,
}

impl TreeContext {
    pub(crate) fn func_prop_support(&self) -> bool { self.options.func_prop_support }

    pub(crate) fn fallback(&self) -> Option<Implementation> { self.options.fallback.clone() }
}

/// Shape of a materialized member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Object,
    Function,
    Value,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::Object => "object",
            SlotKind::Function => "function",
            SlotKind::Value => "value",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
enum Slot {
    Object(DeepMock),
    Function(DeepFn),
    Value(Value),
}

impl Slot {
    fn kind(&self) -> SlotKind {
        match self {
            Slot::Object(_) => SlotKind::Object,
            Slot::Function(_) => SlotKind::Function,
            Slot::Value(_) => SlotKind::Value,
        }
    }
}

#[derive(Default)]
struct Children {
    // First-touch order of keys.
    order: Vec<String>,
    slots: HashMap<String, Slot>,
}

impl Children {
    fn get(&self, key: &str) -> Option<Slot> { self.slots.get(key).cloned() }

    fn insert(&mut self, key: &str, slot: Slot) {
        if self.slots.insert(key.to_string(), slot).is_none() {
            self.order.push(key.to_string());
        }
    }
}

/// An object node of a deep mock.
///
/// Members are materialized on first access and cached; clones are handles to
/// the same node.
#[derive(Clone)]
pub struct DeepMock {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    path:     String,
    tree:     Rc<TreeContext>,
    children: RefCell<Children>,
}

impl DeepMock {
    /// Build the root of a new tree.
    pub fn build(options: DeepMockOptions) -> Self {
        let path = options.name.clone();
        debug!(
            root = %path,
            func_prop_support = options.func_prop_support,
            deep = options.deep,
            "building deep mock"
        );
        Self::node(path, Rc::new(TreeContext { options }))
    }

    pub(crate) fn node(path: String, tree: Rc<TreeContext>) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                path,
                tree,
                children: RefCell::new(Children::default()),
            }),
        }
    }

    /// A fresh root built with the same options as this tree.
    pub fn rebuild(&self) -> Self { Self::build(self.inner.tree.options.clone()) }

    pub fn path(&self) -> &str { &self.inner.path }

    fn child_path(&self, key: &str) -> String { format!("{}.{}", self.inner.path, key) }

    /// Object-shaped access: the nested node under `key`.
    ///
    /// Under `func_prop_support` every member is a function, and this returns
    /// its property view; `method(key)` later yields the same member.
    pub fn prop(&self, key: &str) -> Result<DeepMock> {
        let existing = self.inner.children.borrow().get(key);
        match existing {
            Some(Slot::Object(node)) => Ok(node),
            Some(Slot::Function(member)) if self.inner.tree.func_prop_support() => member.props(),
            Some(slot) => Err(self.conflict(key, slot.kind(), SlotKind::Object)),
            None if !self.inner.tree.options.deep => Err(DeepMockError::NotDeep {
                path: self.child_path(key),
            }),
            None if self.inner.tree.func_prop_support() => self.materialize_fn(key).props(),
            None => {
                let node = DeepMock::node(self.child_path(key), Rc::clone(&self.inner.tree));
                debug!(path = %node.path(), "materialized object member");
                self.inner.children.borrow_mut().insert(key, Slot::Object(node.clone()));
                Ok(node)
            }
        }
    }

    /// Function-shaped access: the callable member under `key`.
    pub fn method(&self, key: &str) -> Result<DeepFn> {
        let existing = self.inner.children.borrow().get(key);
        match existing {
            Some(Slot::Function(member)) => Ok(member),
            Some(slot) => Err(self.conflict(key, slot.kind(), SlotKind::Function)),
            None => Ok(self.materialize_fn(key)),
        }
    }

    fn materialize_fn(&self, key: &str) -> DeepFn {
        let member = DeepFn::new(self.child_path(key), Rc::clone(&self.inner.tree));
        debug!(path = %member.path(), "materialized function member");
        self.inner.children.borrow_mut().insert(key, Slot::Function(member.clone()));
        member
    }

    /// Walk a dotted path of object members, e.g. `"db.users"`.
    pub fn at(&self, path: &str) -> Result<DeepMock> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.clone(), |node, segment| node.prop(segment))
    }

    /// Assign a plain value to `key`.
    ///
    /// An earlier value is replaced; an object or function member is kept and
    /// the assignment fails with `ShapeConflict`.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut children = self.inner.children.borrow_mut();
        if let Some(slot) = children.slots.get(key) {
            if slot.kind() != SlotKind::Value {
                return Err(self.conflict(key, slot.kind(), SlotKind::Value));
            }
        }
        debug!(path = %self.child_path(key), "assigned value member");
        children.insert(key, Slot::Value(value));
        Ok(())
    }

    /// The plain value assigned to `key`, if that member is a value.
    pub fn value(&self, key: &str) -> Option<Value> {
        match self.inner.children.borrow().get(key) {
            Some(Slot::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool { self.inner.children.borrow().slots.contains_key(key) }

    pub fn kind_of(&self, key: &str) -> Option<SlotKind> {
        self.inner.children.borrow().slots.get(key).map(Slot::kind)
    }

    /// Materialized keys, in the order they were first touched.
    pub fn keys(&self) -> Vec<String> { self.inner.children.borrow().order.clone() }

    /// Always fails: members of a deep mock cannot be cleared in place.
    pub fn clear(&self) -> Result<()> { Err(self.restricted("clear")) }

    /// Always fails: members of a deep mock cannot be reset in place.
    pub fn reset(&self) -> Result<()> { Err(self.restricted("reset")) }

    fn restricted(&self, operation: &'static str) -> DeepMockError {
        warn!(path = %self.inner.path, operation, "lifecycle operation refused on deep mock node");
        DeepMockError::LifecycleRestriction {
            operation,
            path: self.inner.path.clone(),
        }
    }

    fn conflict(&self, key: &str, existing: SlotKind, requested: SlotKind) -> DeepMockError {
        DeepMockError::ShapeConflict {
            path: self.child_path(key),
            existing,
            requested,
        }
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &DeepMock) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

impl fmt::Debug for DeepMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepMock")
            .field("path", &self.inner.path)
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deep() -> DeepMock { DeepMock::build(DeepMockOptions::new()) }

    #[test]
    fn test_prop_is_memoized() {
        let root = deep();
        let a = root.prop("a").unwrap();
        assert!(a.ptr_eq(&root.prop("a").unwrap()));
        assert_eq!(a.path(), "mock.a");
    }

    #[test]
    fn test_method_is_memoized() {
        let root = deep();
        let f = root.method("f").unwrap();
        assert!(f.ptr_eq(&root.method("f").unwrap()));
        assert!(f.router().ptr_eq(root.method("f").unwrap().router()));
    }

    #[test]
    fn test_keys_keep_first_touch_order() {
        let root = deep();
        root.method("z").unwrap();
        root.prop("a").unwrap();
        root.set("m", json!(1)).unwrap();
        root.method("z").unwrap();
        root.set("m", json!(2)).unwrap();

        assert_eq!(root.keys(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_shape_conflicts() {
        let root = deep();
        root.prop("obj").unwrap();
        root.method("f").unwrap();
        root.set("v", json!("x")).unwrap();

        let err = root.method("obj").unwrap_err();
        assert!(matches!(err, DeepMockError::ShapeConflict {
            existing: SlotKind::Object,
            requested: SlotKind::Function,
            ..
        }));
        assert!(matches!(root.prop("f"), Err(DeepMockError::ShapeConflict { .. })));
        assert!(matches!(root.prop("v"), Err(DeepMockError::ShapeConflict { .. })));
        assert!(matches!(root.method("v"), Err(DeepMockError::ShapeConflict { .. })));
        assert_eq!(
            err.to_string(),
            "`mock.obj` is already materialized as object, cannot use it as function"
        );
    }

    #[test]
    fn test_set_keeps_existing_members() {
        let root = deep();
        let f = root.method("f").unwrap();
        root.prop("obj").unwrap();

        let err = root.set("f", json!(5)).unwrap_err();
        assert_eq!(err.to_string(), "`mock.f` is already materialized as function, cannot use it as value");
        assert!(matches!(root.set("obj", json!(5)), Err(DeepMockError::ShapeConflict {
            existing: SlotKind::Object,
            requested: SlotKind::Value,
            ..
        })));
        assert!(root.method("f").unwrap().ptr_eq(&f));
        assert_eq!(root.value("f"), None);
    }

    #[test]
    fn test_prop_first_materializes_function_under_func_prop_support() {
        let root = DeepMock::build(DeepMockOptions::new().func_prop_support(true));
        let view = root.prop("a").unwrap();

        assert_eq!(root.kind_of("a"), Some(SlotKind::Function));
        assert!(view.ptr_eq(&root.method("a").unwrap().props().unwrap()));
        assert!(root.at("a.b").unwrap().ptr_eq(&root.method("a").unwrap().prop("b").unwrap()));
    }

    #[test]
    fn test_values_are_plain() {
        let root = deep();
        root.set("id", json!(7)).unwrap();

        assert_eq!(root.value("id"), Some(json!(7)));
        assert_eq!(root.kind_of("id"), Some(SlotKind::Value));
        assert_eq!(root.value("missing"), None);
        assert!(!root.contains("missing"));
    }

    #[test]
    fn test_at_walks_objects() {
        let root = deep();
        let users = root.at("db.users").unwrap();
        assert!(users.ptr_eq(&root.prop("db").unwrap().prop("users").unwrap()));
        assert_eq!(users.path(), "mock.db.users");
        assert!(root.at("").unwrap().ptr_eq(&root));
    }

    #[test]
    fn test_shallow_refuses_objects() {
        let root = DeepMock::build(DeepMockOptions::new().shallow());
        assert!(matches!(root.prop("a"), Err(DeepMockError::NotDeep { .. })));
        assert!(root.method("a").is_ok());
        assert!(!root.contains("x"));
    }

    #[test]
    fn test_rebuild_is_fresh() {
        let root = DeepMock::build(DeepMockOptions::new().name("svc"));
        root.method("f").unwrap();

        let rebuilt = root.rebuild();
        assert!(!rebuilt.ptr_eq(&root));
        assert!(rebuilt.keys().is_empty());
        assert_eq!(rebuilt.path(), "svc");
    }

    #[test]
    fn test_node_lifecycle_restricted() {
        let root = deep();
        let err = root.prop("a").unwrap().reset().unwrap_err();
        assert!(matches!(err, DeepMockError::LifecycleRestriction { operation: "reset", .. }));
        assert!(root.clear().is_err());
    }
}

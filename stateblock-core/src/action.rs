//! Action descriptors and namespaced action creators
//!
//! Every dispatchable action is a plain descriptor: a `"<scope>/<name>"`
//! type string plus an optional payload sequence. Whether the payload field
//! is present at all is the discriminator handlers rely on, never its
//! length: a zero-argument creator call omits the field entirely, while a
//! descriptor built by hand with an empty payload still counts as "payload
//! present".
//!
//! [`ActionNamespace`] manufactures a creator for *any* requested name,
//! including names no builder ever declared. Declared names narrow what is
//! useful, not what is possible; asking a scope for an unknown name yields
//! an ordinary creator whose action simply matches no handler.

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// A dispatchable action: a namespaced type string and an optional
/// payload sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Vec<Value>>,
}

impl ActionDescriptor {
    /// A payload-less action.
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            payload: None,
        }
    }

    /// An action carrying a payload sequence. An empty `payload` here is
    /// still "payload present". Creators never build this shape, but
    /// hand-built descriptors may.
    pub fn with_payload(ty: impl Into<String>, payload: Vec<Value>) -> Self {
        Self {
            ty: ty.into(),
            payload: Some(payload),
        }
    }

    /// The fully-qualified type string, `"<scope>/<name>"`.
    pub fn type_name(&self) -> &str {
        &self.ty
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&[Value]> {
        self.payload.as_deref()
    }

    /// The payload as positional handler arguments: whatever sequence is
    /// present, or the empty slice when the field is absent.
    pub fn args(&self) -> &[Value] {
        self.payload.as_deref().unwrap_or(&[])
    }
}

/// Builds descriptors for one fully-qualified action type.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCreator {
    ty: String,
}

impl ActionCreator {
    fn new(scope: &str, name: &str) -> Self {
        Self {
            ty: format!("{scope}/{name}"),
        }
    }

    /// The type string this creator produces.
    pub fn type_name(&self) -> &str {
        &self.ty
    }

    /// Zero-argument call: the descriptor has no payload field.
    pub fn act(&self) -> ActionDescriptor {
        ActionDescriptor::new(&self.ty)
    }

    /// Call with arguments. One or more values become the payload, in
    /// order; an empty iterator behaves exactly like [`act`](Self::act).
    pub fn with<I: IntoIterator<Item = Value>>(&self, args: I) -> ActionDescriptor {
        let payload: Vec<Value> = args.into_iter().collect();
        if payload.is_empty() {
            ActionDescriptor::new(&self.ty)
        } else {
            ActionDescriptor::with_payload(&self.ty, payload)
        }
    }
}

/// Manufactures creators scoped under one name.
///
/// Any property name works: the set of declared actions narrows which
/// creators are *useful*, never which can be asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionNamespace {
    scope: String,
}

impl ActionNamespace {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The fully-qualified type string for a member name.
    pub fn type_of(&self, name: &str) -> String {
        format!("{}/{name}", self.scope)
    }

    /// A creator for any member name, declared or not.
    pub fn creator(&self, name: &str) -> ActionCreator {
        ActionCreator::new(&self.scope, name)
    }
}

/// The action access path of a block or composition.
///
/// A plain block exposes its own namespace. A composition exposes its
/// children's trees under their registration names, plus its own namespace
/// for composition-level effects. Nesting moves only the *access path*: a
/// child's creators keep the child's own type strings, the parent's name is
/// never prefixed onto them.
#[derive(Clone, Debug)]
pub enum ActionTree {
    /// A single block's namespace.
    Scope(ActionNamespace),
    /// A composition: its own namespace plus named child trees.
    Group {
        scope: ActionNamespace,
        children: IndexMap<String, ActionTree>,
    },
}

impl ActionTree {
    pub(crate) fn scope(ns: ActionNamespace) -> Self {
        ActionTree::Scope(ns)
    }

    pub(crate) fn group(ns: ActionNamespace, children: IndexMap<String, ActionTree>) -> Self {
        ActionTree::Group {
            scope: ns,
            children,
        }
    }

    /// The namespace at this node (a composition's own scope, or the
    /// block's).
    pub fn namespace(&self) -> &ActionNamespace {
        match self {
            ActionTree::Scope(ns) => ns,
            ActionTree::Group { scope, .. } => scope,
        }
    }

    /// A creator under this node's own namespace.
    pub fn creator(&self, name: &str) -> ActionCreator {
        self.namespace().creator(name)
    }

    /// The child tree registered under `name`, if this is a composition.
    pub fn child(&self, name: &str) -> Option<&ActionTree> {
        match self {
            ActionTree::Scope(_) => None,
            ActionTree::Group { children, .. } => children.get(name),
        }
    }

    /// Walk child names, returning the tree at the end of the path.
    /// An empty path is this node.
    pub fn at_path(&self, path: &[&str]) -> Option<&ActionTree> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.child(head)?.at_path(rest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_arg_call_omits_payload() {
        let ns = ActionNamespace::new("counter");
        let action = ns.creator("inc").act();
        assert_eq!(action.type_name(), "counter/inc");
        assert!(!action.has_payload());
        assert_eq!(action.args(), &[] as &[Value]);
    }

    #[test]
    fn test_args_become_payload_in_order() {
        let ns = ActionNamespace::new("counter");
        let action = ns.creator("add").with([Value::from(10), Value::from("x")]);
        assert_eq!(action.type_name(), "counter/add");
        assert_eq!(
            action.payload(),
            Some(&[Value::from(10), Value::from("x")][..])
        );
    }

    #[test]
    fn test_empty_with_behaves_like_act() {
        let ns = ActionNamespace::new("counter");
        let action = ns.creator("inc").with([]);
        assert!(!action.has_payload());
    }

    #[test]
    fn test_manual_empty_payload_is_still_present() {
        let action = ActionDescriptor::with_payload("counter/inc", vec![]);
        assert!(action.has_payload());
        assert_eq!(action.args(), &[] as &[Value]);
    }

    #[test]
    fn test_undeclared_names_still_work() {
        let ns = ActionNamespace::new("counter");
        let action = ns.creator("neverDeclared").act();
        assert_eq!(action.type_name(), "counter/neverDeclared");
    }

    #[test]
    fn test_serialized_shape() {
        let bare = ActionDescriptor::new("counter/inc");
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            serde_json::json!({"type": "counter/inc"})
        );

        let loaded = ActionDescriptor::with_payload("counter/add", vec![Value::from(5)]);
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            serde_json::json!({"type": "counter/add", "payload": [5]})
        );
    }

    #[test]
    fn test_tree_paths() {
        let child = ActionTree::scope(ActionNamespace::new("counter"));
        let mut children = IndexMap::new();
        children.insert("counter".to_string(), child);
        let root = ActionTree::group(ActionNamespace::new("root"), children);

        // Nesting moves the access path, not the type string.
        let creator = root.at_path(&["counter"]).unwrap().creator("inc");
        assert_eq!(creator.type_name(), "counter/inc");

        // The composition's own namespace is still reachable.
        assert_eq!(root.creator("refresh").type_name(), "root/refresh");
        assert!(root.at_path(&["missing"]).is_none());
    }
}

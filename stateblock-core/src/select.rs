//! Selector trees and lifting
//!
//! A selector is a pure derivation from a state value. Blocks hold them in
//! a tree: leaves are selector functions, interior nodes are named groups.
//! When a block is nested into a composition its selectors are written
//! against the block's own slice, not the composite state. *Lifting*
//! re-targets every leaf onto an ancestor shape by threading a projection
//! function in front of it, preserving the tree's shape exactly.
//!
//! Lifting composes: lifting a lifted tree again is the same as lifting
//! the original once with the composed projection.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// A pure derivation from a state value.
pub type Selector = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A projection from an ancestor state down to the state a selector
/// expects.
pub type Projection = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Wrap a closure as a [`Projection`].
pub fn projection<F>(f: F) -> Projection
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A tree of selectors: a leaf function or a named group of subtrees.
#[derive(Clone)]
pub enum SelectorTree {
    Leaf(Selector),
    Node(IndexMap<String, SelectorTree>),
}

impl SelectorTree {
    /// A leaf selector from a closure.
    pub fn leaf<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        SelectorTree::Leaf(Arc::new(f))
    }

    /// An empty group node.
    pub fn empty() -> Self {
        SelectorTree::Node(IndexMap::new())
    }

    /// A group node from named subtrees.
    pub fn node<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SelectorTree)>,
    {
        SelectorTree::Node(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, SelectorTree::Leaf(_))
    }

    /// The subtree under `name`, if this is a group.
    pub fn get(&self, name: &str) -> Option<&SelectorTree> {
        match self {
            SelectorTree::Leaf(_) => None,
            SelectorTree::Node(m) => m.get(name),
        }
    }

    /// Walk group names to the subtree at the end of the path. An empty
    /// path is this node.
    pub fn at_path(&self, path: &[&str]) -> Option<&SelectorTree> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.get(head)?.at_path(rest),
        }
    }

    /// Evaluate this node as a leaf. `None` for group nodes.
    pub fn eval(&self, state: &Value) -> Option<Value> {
        match self {
            SelectorTree::Leaf(f) => Some(f(state)),
            SelectorTree::Node(_) => None,
        }
    }

    /// Evaluate the leaf at the end of a path.
    pub fn eval_at(&self, path: &[&str], state: &Value) -> Option<Value> {
        self.at_path(path)?.eval(state)
    }
}

impl fmt::Debug for SelectorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorTree::Leaf(_) => f.write_str("Leaf(..)"),
            SelectorTree::Node(m) => f.debug_map().entries(m.iter()).finish(),
        }
    }
}

/// Re-target every leaf of `tree` onto an ancestor state shape.
///
/// Each leaf `f` becomes `|ancestor| f(&project(ancestor))`; group nodes
/// keep their keys and nesting depth exactly.
pub fn lift(tree: &SelectorTree, project: Projection) -> SelectorTree {
    match tree {
        SelectorTree::Leaf(f) => {
            let f = f.clone();
            SelectorTree::Leaf(Arc::new(move |state: &Value| f(&project(state))))
        }
        SelectorTree::Node(m) => SelectorTree::Node(
            m.iter()
                .map(|(k, v)| (k.clone(), lift(v, project.clone())))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_selector() -> SelectorTree {
        SelectorTree::leaf(|s: &Value| s.get("count").cloned().unwrap_or(Value::Null))
    }

    fn slice(name: &'static str) -> Projection {
        projection(move |s: &Value| s.get(name).cloned().unwrap_or(Value::Null))
    }

    #[test]
    fn test_lift_preserves_shape() {
        let tree = SelectorTree::node([
            ("count", count_selector()),
            (
                "nested",
                SelectorTree::node([("count", count_selector())]),
            ),
        ]);
        let lifted = lift(&tree, slice("inner"));

        assert!(lifted.get("count").unwrap().is_leaf());
        assert!(lifted.at_path(&["nested", "count"]).unwrap().is_leaf());
        assert!(lifted.get("missing").is_none());
    }

    #[test]
    fn test_lift_through_two_levels() {
        // state => state.count, lifted through {outer: {inner: {count: 42}}}
        let leaf = count_selector();
        let lifted = lift(&lift(&leaf, slice("inner")), slice("outer"));

        let root = Value::from_entries([(
            "outer",
            Value::from_entries([("inner", Value::from_entries([("count", Value::from(42))]))]),
        )]);
        assert_eq!(lifted.eval(&root), Some(Value::from(42)));
    }

    #[test]
    fn test_composition_law_two_levels() {
        let tree = SelectorTree::node([("count", count_selector())]);

        let twice = lift(&lift(&tree, slice("inner")), slice("outer"));
        let once = lift(
            &tree,
            projection(|s: &Value| {
                let outer = s.get("outer").cloned().unwrap_or(Value::Null);
                outer.get("inner").cloned().unwrap_or(Value::Null)
            }),
        );

        let root = Value::from_entries([(
            "outer",
            Value::from_entries([("inner", Value::from_entries([("count", Value::from(7))]))]),
        )]);
        assert_eq!(
            twice.eval_at(&["count"], &root),
            once.eval_at(&["count"], &root)
        );
        assert_eq!(twice.eval_at(&["count"], &root), Some(Value::from(7)));
    }

    #[test]
    fn test_composition_law_three_levels() {
        let tree = SelectorTree::node([("count", count_selector())]);

        let stepwise = lift(&lift(&lift(&tree, slice("c")), slice("b")), slice("a"));
        let fused = lift(
            &tree,
            projection(|s: &Value| {
                let a = s.get("a").cloned().unwrap_or(Value::Null);
                let b = a.get("b").cloned().unwrap_or(Value::Null);
                b.get("c").cloned().unwrap_or(Value::Null)
            }),
        );

        let root = Value::from_entries([(
            "a",
            Value::from_entries([(
                "b",
                Value::from_entries([(
                    "c",
                    Value::from_entries([("count", Value::from("deep"))]),
                )]),
            )]),
        )]);
        assert_eq!(
            stepwise.eval_at(&["count"], &root),
            fused.eval_at(&["count"], &root)
        );
        assert_eq!(stepwise.eval_at(&["count"], &root), Some(Value::from("deep")));
    }
}

//! Composing blocks into a composite block
//!
//! A composition registers named child blocks and produces a [`Block`]
//! whose state is the keyed union of the children's states, in
//! registration order. The composite:
//!
//! - reduces by running every child's reducer against its own slice,
//!   shallow-copying the top-level map at most once and only when some
//!   child actually changed, so unrelated actions return the input state
//!   back untouched;
//! - exposes each child's action creators under the child's registration
//!   name, *without* re-prefixing the child's type strings (nesting moves
//!   the access path, never the type);
//! - lifts each child's selector tree onto the composite shape, so every
//!   selector a child declared stays reachable under the child's name;
//! - merges every child's effect table with the composition's own
//!   namespaced effects into one flat dispatch table.
//!
//! Compositions nest: a composite block registers into a further
//! composition like any other block.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::action::{ActionDescriptor, ActionNamespace, ActionTree};
use crate::block::{Block, EffectTable, EffectsFactory};
use crate::context::Context;
use crate::select::{lift, projection, SelectorTree};
use crate::value::Value;

/// Accumulates named child blocks plus composition-level effects and
/// selectors.
///
/// # Example
///
/// ```ignore
/// let root = CompositionBuilder::new("root")
///     .block("counter", counter_block)
///     .block("message", message_block)
///     .build();
///
/// // Child types keep their own namespaces:
/// let inc = root.actions().at_path(&["counter"]).unwrap().creator("inc");
/// assert_eq!(inc.type_name(), "counter/inc");
/// ```
pub struct CompositionBuilder {
    name: String,
    namespace: ActionNamespace,
    children: IndexMap<String, Block>,
    factories: Vec<EffectsFactory>,
    selectors: IndexMap<String, SelectorTree>,
}

impl CompositionBuilder {
    /// An empty composition. Its own namespace exists from the start and
    /// is used only if the composition registers its own effects.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            namespace: ActionNamespace::new(name.clone()),
            name,
            children: IndexMap::new(),
            factories: Vec::new(),
            selectors: IndexMap::new(),
        }
    }

    /// Register a child block under `name`. Registering the same name
    /// again replaces the earlier child everywhere (reducer slot, action
    /// tree, lifted selectors, effects), last-wins as usual.
    pub fn block(mut self, name: &str, child: Block) -> Self {
        self.children.insert(name.to_string(), child);
        self
    }

    /// Shallow-merge composition-level selectors, each written against the
    /// *full* composite state. They coexist with the per-child lifted
    /// trees; an overlapping name replaces the child entry.
    pub fn selectors<K, I>(mut self, map: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SelectorTree)>,
    {
        for (name, tree) in map {
            self.selectors.insert(name.into(), tree);
        }
        self
    }

    /// Register a single composition-level leaf selector.
    pub fn selector<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.selectors([(name.to_string(), SelectorTree::leaf(f))])
    }

    /// Append a composition-level effects factory, namespaced under the
    /// composition's own name. Same additive/last-wins semantics as
    /// [`BlockBuilder::effects`](crate::builder::BlockBuilder::effects).
    pub fn effects<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Context) -> EffectTable + Send + Sync + 'static,
    {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Close the composition into a composite [`Block`].
    pub fn build(self) -> Block {
        let CompositionBuilder {
            name,
            namespace,
            children,
            factories,
            selectors,
        } = self;

        let initial = Value::from_map(
            children
                .iter()
                .map(|(slot, child)| (slot.clone(), child.initial().clone()))
                .collect(),
        );

        let reducer = {
            let children = children.clone();
            Arc::new(move |state: Option<&Value>, action: &ActionDescriptor| -> Value {
                if let Some(Value::Map(slices)) = state {
                    // The top-level map is copied lazily, once, on the
                    // first child that actually changed.
                    let mut next: Option<IndexMap<String, Value>> = None;
                    for (slot, child) in children.iter() {
                        let before = slices.get(slot);
                        let after = child.reduce(before, action);
                        let changed = match before {
                            Some(before) => !Value::same(before, &after),
                            None => true,
                        };
                        if changed {
                            next.get_or_insert_with(|| (**slices).clone())
                                .insert(slot.clone(), after);
                        }
                    }
                    return match next {
                        Some(copied) => Value::from_map(copied),
                        // No child changed: the exact input state back.
                        None => state.cloned().unwrap_or(Value::Null),
                    };
                }

                // Absent (or non-map) state: every slice starts from
                // scratch.
                Value::from_map(
                    children
                        .iter()
                        .map(|(slot, child)| (slot.clone(), child.reduce(None, action)))
                        .collect(),
                )
            })
        };

        let effects = {
            let children = children.clone();
            let ns = namespace.clone();
            Arc::new(move |context: &Context| -> EffectTable {
                let mut table = EffectTable::new();
                for child in children.values() {
                    table.extend(child.effects(context));
                }
                // The composition's own handlers: merge the factories
                // last-wins on the unqualified name, then namespace.
                let mut own = EffectTable::new();
                for factory in &factories {
                    for (effect_name, handler) in factory(context) {
                        own.insert(effect_name, handler);
                    }
                }
                for (effect_name, handler) in own {
                    table.insert(ns.type_of(&effect_name), handler);
                }
                table
            })
        };

        let actions = ActionTree::group(
            namespace,
            children
                .iter()
                .map(|(slot, child)| (slot.clone(), child.actions().clone()))
                .collect(),
        );

        // Per-child lifted trees first, composition-level entries merged
        // on top (they were registered against the full composite state).
        let mut select_tree: IndexMap<String, SelectorTree> = IndexMap::new();
        for (slot, child) in children.iter() {
            let key = slot.clone();
            let fallback = child.initial().clone();
            let project = projection(move |state: &Value| {
                state.get(&key).cloned().unwrap_or_else(|| fallback.clone())
            });
            select_tree.insert(slot.clone(), lift(child.select(), project));
        }
        for (name, tree) in selectors {
            select_tree.insert(name, tree);
        }

        Block::new(
            name,
            initial,
            reducer,
            effects,
            actions,
            SelectorTree::Node(select_tree),
        )
    }
}

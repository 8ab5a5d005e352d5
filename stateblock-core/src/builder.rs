//! The block builder
//!
//! Accumulates named action handlers, effect factories, and selector maps,
//! then closes them into an immutable [`Block`] at `build()`. The builder
//! exclusively owns its accumulating maps until then; the built block
//! shares the registered closures by reference and has no mutation path.
//!
//! Registration policy, uniform across the library: *last wins*. Repeating
//! an action name silently replaces the earlier handler, later effect
//! factories replace earlier handlers under the same unqualified name, and
//! repeated `selectors` calls replace only overlapping names.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::action::{ActionDescriptor, ActionNamespace, ActionTree};
use crate::block::{ActionHandler, Block, EffectTable, EffectsFactory};
use crate::context::Context;
use crate::select::SelectorTree;
use crate::value::Value;

/// Accumulates one block's handlers, effect factories, and selectors.
///
/// # Example
///
/// ```ignore
/// let counter = BlockBuilder::new("counter", Value::from(0))
///     .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
///     .action("add", |s, args| {
///         Value::from(s.as_int().unwrap_or(0) + args[0].as_int().unwrap_or(0))
///     })
///     .selector("value", |s| s.clone())
///     .build();
///
/// let inc = counter.actions().creator("inc").act();
/// assert_eq!(inc.type_name(), "counter/inc");
/// ```
pub struct BlockBuilder {
    name: String,
    initial: Value,
    handlers: IndexMap<String, ActionHandler>,
    factories: Vec<EffectsFactory>,
    selectors: IndexMap<String, SelectorTree>,
}

impl BlockBuilder {
    /// An empty builder: no handlers, no effect factories, no selectors.
    pub fn new(name: impl Into<String>, initial: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            initial: initial.into(),
            handlers: IndexMap::new(),
            factories: Vec::new(),
            selectors: IndexMap::new(),
        }
    }

    /// Register a state-transition handler under
    /// `"<blockName>/<name>"`. Registering the same name again replaces
    /// the earlier handler.
    pub fn action<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Append an effects factory. Factories are additive: at build time
    /// all of them run against the same context, their tables merge
    /// last-wins on the *unqualified* effect name, and every key is then
    /// namespaced to `"<blockName>/<effectName>"`.
    ///
    /// Factory keys are the unqualified effect names.
    pub fn effects<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Context) -> EffectTable + Send + Sync + 'static,
    {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Register a single leaf selector.
    pub fn selector<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.selectors([(name.to_string(), SelectorTree::leaf(f))])
    }

    /// Shallow-merge named selector trees into the accumulated map.
    /// Repeat calls add or replace individual names without discarding
    /// previously added ones.
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

    /// Close the accumulated registrations into an immutable [`Block`].
    pub fn build(self) -> Block {
        let BlockBuilder {
            name,
            initial,
            handlers,
            factories,
            selectors,
        } = self;

        let namespace = ActionNamespace::new(name.clone());

        // Handlers are registered unqualified; key the dispatch map by the
        // fully-qualified type string the creators will produce.
        let dispatch: IndexMap<String, ActionHandler> = handlers
            .into_iter()
            .map(|(action_name, handler)| (namespace.type_of(&action_name), handler))
            .collect();

        let reducer = {
            let initial = initial.clone();
            Arc::new(move |state: Option<&Value>, action: &ActionDescriptor| -> Value {
                match dispatch.get(action.type_name()) {
                    Some(handler) => {
                        let current = state.cloned().unwrap_or_else(|| initial.clone());
                        handler(current, action.args())
                    }
                    // Unmatched type: the same state back, or the initial
                    // value when state is absent.
                    None => state.cloned().unwrap_or_else(|| initial.clone()),
                }
            })
        };

        let effects = {
            let ns = namespace.clone();
            Arc::new(move |context: &Context| -> EffectTable {
                let mut merged = EffectTable::new();
                for factory in &factories {
                    for (effect_name, handler) in factory(context) {
                        merged.insert(effect_name, handler);
                    }
                }
                merged
                    .into_iter()
                    .map(|(effect_name, handler)| (ns.type_of(&effect_name), handler))
                    .collect()
            })
        };

        Block::new(
            name,
            initial,
            reducer,
            effects,
            ActionTree::scope(namespace),
            SelectorTree::Node(selectors),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::EffectHandler;

    fn counter() -> Block {
        BlockBuilder::new("counter", Value::from(0))
            .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
            .action("add", |s, args| {
                Value::from(s.as_int().unwrap_or(0) + args[0].as_int().unwrap_or(0))
            })
            .build()
    }

    fn noop_handler() -> EffectHandler {
        Arc::new(|_: &[Value]| {})
    }

    #[test]
    fn test_counter_scenario() {
        let block = counter();
        let inc = block.actions().creator("inc").act();
        assert_eq!(inc.type_name(), "counter/inc");
        assert!(!inc.has_payload());

        assert_eq!(block.reduce(Some(&Value::from(0)), &inc), Value::from(1));

        let add = block.actions().creator("add").with([Value::from(10)]);
        assert_eq!(block.reduce(Some(&Value::from(1)), &add), Value::from(11));
    }

    #[test]
    fn test_absent_state_reduces_to_initial() {
        let block = counter();
        let unrelated = ActionDescriptor::new("other/thing");
        assert_eq!(block.reduce(None, &unrelated), Value::from(0));

        // A matching handler with absent state also starts from initial.
        let inc = block.actions().creator("inc").act();
        assert_eq!(block.reduce(None, &inc), Value::from(1));
    }

    #[test]
    fn test_unmatched_type_returns_the_same_state() {
        let block = BlockBuilder::new("list", Value::from(vec![Value::from(1)])).build();
        let state = block.initial().clone();
        let next = block.reduce(Some(&state), &ActionDescriptor::new("list/never"));
        assert!(Value::same(&state, &next));
    }

    #[test]
    fn test_action_registration_is_last_wins() {
        let block = BlockBuilder::new("counter", Value::from(0))
            .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
            .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 100))
            .build();
        let inc = block.actions().creator("inc").act();
        assert_eq!(block.reduce(Some(&Value::from(0)), &inc), Value::from(100));
    }

    #[test]
    fn test_effect_factories_merge_last_wins_then_namespace() {
        let block = BlockBuilder::new("timer", Value::Null)
            .effects(|_: &Context| {
                let mut t = EffectTable::new();
                t.insert("start".to_string(), noop_handler());
                t.insert("stop".to_string(), noop_handler());
                t
            })
            .effects(|_: &Context| {
                let mut t = EffectTable::new();
                t.insert("start".to_string(), noop_handler());
                t
            })
            .build();

        let table = block.effects(&Context::new());
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("timer/start"));
        assert!(table.contains_key("timer/stop"));
    }

    #[test]
    fn test_selectors_accumulate_across_calls() {
        let block = BlockBuilder::new("counter", Value::from(0))
            .selector("value", |s| s.clone())
            .selectors([
                ("value".to_string(), SelectorTree::leaf(|_| Value::from(-1))),
                (
                    "doubled".to_string(),
                    SelectorTree::leaf(|s| Value::from(s.as_int().unwrap_or(0) * 2)),
                ),
            ])
            .build();

        // "value" was replaced, "doubled" was added, nothing was dropped.
        let state = Value::from(21);
        assert_eq!(
            block.select().eval_at(&["value"], &state),
            Some(Value::from(-1))
        );
        assert_eq!(
            block.select().eval_at(&["doubled"], &state),
            Some(Value::from(42))
        );
    }

    #[test]
    fn test_handler_panic_propagates() {
        let block = BlockBuilder::new("boom", Value::Null)
            .action("go", |_, _| panic!("defective handler"))
            .build();
        let action = block.actions().creator("go").act();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            block.reduce(None, &action)
        }));
        assert!(result.is_err());
    }
}

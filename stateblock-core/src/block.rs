//! The Block: one named, composable unit of state management
//!
//! A block bundles a named state slice, its initial value, a reducer over
//! namespaced actions, an effects factory, and a selector tree. Blocks are
//! immutable once built: composing them into larger blocks wraps the same
//! underlying closures by reference, it never copies or rewires them.
//!
//! Blocks come out of [`BlockBuilder`](crate::builder::BlockBuilder) and
//! [`CompositionBuilder`](crate::compose::CompositionBuilder); a composite
//! block is indistinguishable from a hand-built one at this level.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::action::{ActionDescriptor, ActionTree};
use crate::context::Context;
use crate::select::SelectorTree;
use crate::value::Value;

/// A registered state-transition function: current state plus the action's
/// positional payload arguments, returning the next state.
pub type ActionHandler = Arc<dyn Fn(Value, &[Value]) -> Value + Send + Sync>;

/// An impure handler invoked with a matching action's payload arguments.
pub type EffectHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// A flat effect dispatch table keyed by fully-qualified type string.
pub type EffectTable = IndexMap<String, EffectHandler>;

/// Builds an effect table from a context. Called exactly once per effects
/// middleware, never per action.
pub type EffectsFactory = Arc<dyn Fn(&Context) -> EffectTable + Send + Sync>;

/// A block's reducer. `None` state stands for "not yet initialized" and
/// reduces to the initial value when no handler matches.
pub type BlockReducer = Arc<dyn Fn(Option<&Value>, &ActionDescriptor) -> Value + Send + Sync>;

/// An immutable, composable unit: name, initial state, reducer, effects
/// factory, action creators, and selectors.
#[derive(Clone)]
pub struct Block {
    name: String,
    initial: Value,
    reducer: BlockReducer,
    effects: EffectsFactory,
    actions: ActionTree,
    selectors: SelectorTree,
}

impl Block {
    pub(crate) fn new(
        name: String,
        initial: Value,
        reducer: BlockReducer,
        effects: EffectsFactory,
        actions: ActionTree,
        selectors: SelectorTree,
    ) -> Self {
        Self {
            name,
            initial,
            reducer,
            effects,
            actions,
            selectors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Run the reducer. Absent state reduces to the initial value when no
    /// handler matches; an unmatched type returns the input state back
    /// unchanged (same underlying value, observable via [`Value::same`]).
    pub fn reduce(&self, state: Option<&Value>, action: &ActionDescriptor) -> Value {
        (self.reducer)(state, action)
    }

    /// The reducer itself, pluggable directly into a host store.
    pub fn reducer(&self) -> &BlockReducer {
        &self.reducer
    }

    /// Build the effect dispatch table for a concrete context.
    pub fn effects(&self, context: &Context) -> EffectTable {
        (self.effects)(context)
    }

    /// The block's action creators.
    pub fn actions(&self) -> &ActionTree {
        &self.actions
    }

    /// The block's selector tree.
    pub fn select(&self) -> &SelectorTree {
        &self.selectors
    }

    /// Rebind the effects factory to a different context shape.
    ///
    /// The returned block is identical in actions, reducer, and selectors;
    /// only its factory changes, to `|new| old_factory(&adapter(new))`.
    /// Pure argument translation, nothing else.
    pub fn map_context<F>(&self, adapter: F) -> Block
    where
        F: Fn(&Context) -> Context + Send + Sync + 'static,
    {
        let inner = self.effects.clone();
        Block {
            effects: Arc::new(move |context: &Context| inner(&adapter(context))),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("selectors", &self.selectors)
            .finish()
    }
}

//! Routing dispatched actions to effect handlers
//!
//! [`EffectsMiddleware`] sits in the host's middleware chain, before the
//! reducer. At construction it calls the block's effects factory exactly
//! once against a concrete context, keeping the resulting flat dispatch
//! table for the store's lifetime. For every dispatched action whose type
//! is a key of that table, the handler runs with the action's payload
//! arguments, and the action then continues to the reducer regardless.
//!
//! Effect-triggering actions are usually no-ops for the reducer (nothing
//! registers a state handler under an effect's type), but the two
//! mechanisms are independent: a type serving both fires both.

use std::fmt;

use crate::action::ActionDescriptor;
use crate::block::{Block, EffectTable};
use crate::context::Context;
use crate::store::Middleware;

/// Middleware that invokes effect handlers for matching action types.
pub struct EffectsMiddleware {
    table: EffectTable,
}

impl EffectsMiddleware {
    /// Build the dispatch table by running `block.effects(context)` once.
    ///
    /// Context is consumed here and never again: per-action data must
    /// travel in payloads, not in the context.
    pub fn new(block: &Block, context: &Context) -> Self {
        Self {
            table: block.effects(context),
        }
    }

    /// Whether a type string would route to a handler.
    pub fn handles(&self, type_name: &str) -> bool {
        self.table.contains_key(type_name)
    }

    /// The registered type strings, in table order.
    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Middleware<ActionDescriptor> for EffectsMiddleware {
    fn before(&mut self, action: &ActionDescriptor) {
        if let Some(handler) = self.table.get(action.type_name()) {
            tracing::debug!(action = %action.type_name(), "Routing action to effect handler");
            handler(action.args());
        }
    }

    fn after(&mut self, _action: &ActionDescriptor, _state_changed: bool) {}
}

impl fmt::Debug for EffectsMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectsMiddleware")
            .field("types", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

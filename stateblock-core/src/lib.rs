//! Core types and composition engine for stateblock
//!
//! This crate provides the block composition and lifting engine for
//! single-store, reducer/action/middleware state management. A *block*
//! owns a named slice of a state tree along with its pure state
//! transitions (actions), impure handlers driven through the same
//! dispatch channel (effects), and derived-value functions (selectors).
//! Many blocks compose into one root block with no hand-written glue.
//!
//! # Core Concepts
//!
//! - **Block**: composable unit bundling state, actions, effects, and
//!   selectors under one name
//! - **Action**: a `"<scope>/<name>"` descriptor with an optional payload
//!   sequence, plus the handler registered for that type
//! - **Composition**: a block whose state is the named union of child
//!   blocks' states, with merged actions/effects/selectors
//! - **Lifting**: re-targeting a selector tree onto an ancestor state via
//!   a projection function
//! - **Effects middleware**: routes matching dispatched actions to effect
//!   handlers before the reducer, forwarding unconditionally
//!
//! # Basic Example
//!
//! ```ignore
//! use stateblock_core::prelude::*;
//!
//! let counter = BlockBuilder::new("counter", Value::from(0))
//!     .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
//!     .action("add", |s, args| {
//!         Value::from(s.as_int().unwrap_or(0) + args[0].as_int().unwrap_or(0))
//!     })
//!     .build();
//!
//! let root = CompositionBuilder::new("root")
//!     .block("counter", counter)
//!     .build();
//!
//! let mut store = Store::from_block(&root);
//! let inc = root.actions().at_path(&["counter"]).unwrap().creator("inc");
//! store.dispatch(inc.act());
//! assert_eq!(store.state().get("counter"), Some(&Value::from(1)));
//! ```
//!
//! # Effects
//!
//! Effects are impure handlers keyed by namespaced type string. They are
//! registered through factories that receive a [`Context`] (a caller
//! supplied dependency bag) exactly once, when the
//! [`EffectsMiddleware`] is constructed. A dispatched action whose type
//! matches an effect's entry invokes the handler with the payload
//! arguments and still reaches the reducer afterwards. Handlers may start
//! their own async work and dispatch again later; each such dispatch is an
//! ordinary, separate cycle.

pub mod action;
pub mod block;
pub mod builder;
pub mod compose;
pub mod context;
pub mod effects;
pub mod select;
pub mod store;
pub mod testing;
pub mod value;

// Action exports
pub use action::{ActionCreator, ActionDescriptor, ActionNamespace, ActionTree};

// Block exports
pub use block::{
    ActionHandler, Block, BlockReducer, EffectHandler, EffectTable, EffectsFactory,
};

// Builder exports
pub use builder::BlockBuilder;
pub use compose::CompositionBuilder;

// Selector exports
pub use select::{lift, projection, Projection, Selector, SelectorTree};

// Context exports
pub use context::Context;

// Store exports
pub use store::{
    Action, ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware, Store,
    StoreWithMiddleware, INIT_TYPE,
};

// Effects middleware exports
pub use effects::EffectsMiddleware;

// Value exports
pub use value::Value;

// Testing exports
pub use testing::{effect_probe, EffectLog, RecordingMiddleware};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{ActionCreator, ActionDescriptor, ActionNamespace, ActionTree};
    pub use crate::block::{Block, EffectHandler, EffectTable};
    pub use crate::builder::BlockBuilder;
    pub use crate::compose::CompositionBuilder;
    pub use crate::context::Context;
    pub use crate::effects::EffectsMiddleware;
    pub use crate::select::{lift, projection, SelectorTree};
    pub use crate::store::{
        Action, ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware, Store,
        StoreWithMiddleware,
    };
    pub use crate::value::Value;
}

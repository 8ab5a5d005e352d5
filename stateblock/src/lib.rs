//! stateblock: composable block state management
//!
//! Define independent blocks, each owning a named state slice, its pure
//! state transitions, optional effects, and selectors, then compose them
//! into one root reducer/action/effect/selector surface.
//!
//! # Example
//! ```ignore
//! use stateblock::prelude::*;
//!
//! let counter = BlockBuilder::new("counter", Value::from(0))
//!     .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
//!     .build();
//!
//! let root = CompositionBuilder::new("root")
//!     .block("counter", counter)
//!     .build();
//!
//! let mut store = Store::from_block(&root);
//! store.dispatch(root.actions().at_path(&["counter"]).unwrap().creator("inc").act());
//! ```

// Re-export everything from core
pub use stateblock_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use stateblock_core::prelude::*;
}

//! Reference host store and the middleware chain protocol
//!
//! The composition engine only *produces* blocks; driving them belongs to
//! a host store. This module is the reference host: a single-threaded
//! container that owns a [`Value`] state and a block's reducer, plus the
//! middleware protocol an external host must honor: every middleware's
//! `before` hook runs prior to the reducer for each dispatched action, and
//! the action always reaches the reducer afterwards.
//!
//! Dispatching from inside a reducer is not representable here: the store
//! borrows itself mutably for the whole dispatch.

use crate::action::ActionDescriptor;
use crate::block::{Block, BlockReducer};
use crate::value::Value;

/// The type string of the synthetic action used to initialize state.
/// No block registers a handler for it, so every reducer falls through to
/// its initial value.
pub const INIT_TYPE: &str = "@init";

/// Anything dispatchable: named for logging and filtering.
pub trait Action: Clone + std::fmt::Debug + Send + 'static {
    /// The action's name (for descriptors, the full type string).
    fn name(&self) -> &str;
}

impl Action for ActionDescriptor {
    fn name(&self) -> &str {
        self.type_name()
    }
}

/// Middleware hooks around each dispatch.
///
/// `before` runs prior to the reducer; `after` runs once the reducer has
/// produced the next state. Neither can stop the action from reaching the
/// reducer; forwarding is unconditional.
pub trait Middleware<A: Action> {
    /// Called before the action reaches the reducer.
    fn before(&mut self, action: &A);

    /// Called after the reducer ran, with whether state changed.
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs dispatches through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch.
    pub log_before: bool,
    /// Whether to log after dispatch.
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Default settings: log after only.
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after.
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl Middleware<ActionDescriptor> for LoggingMiddleware {
    fn before(&mut self, action: &ActionDescriptor) {
        if self.log_before {
            tracing::debug!(
                action = %action.type_name(),
                payload = %serde_json::to_string(action).unwrap_or_default(),
                "Dispatching action"
            );
        }
    }

    fn after(&mut self, action: &ActionDescriptor, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.type_name(),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// Compose multiple middleware into one.
///
/// `before` hooks run in insertion order, `after` hooks in reverse, so the
/// composed units nest properly.
pub struct ComposedMiddleware<A: Action> {
    middlewares: Vec<Box<dyn Middleware<A>>>,
}

impl<A: Action> std::fmt::Debug for ComposedMiddleware<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<A: Action> Default for ComposedMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> ComposedMiddleware<A> {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the composition.
    pub fn add<M: Middleware<A> + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Builder-style [`add`](Self::add).
    pub fn with<M: Middleware<A> + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }
}

impl<A: Action> Middleware<A> for ComposedMiddleware<A> {
    fn before(&mut self, action: &A) {
        for middleware in &mut self.middlewares {
            middleware.before(action);
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(action, state_changed);
        }
    }
}

/// The reference host: owns the state and a block's reducer.
///
/// # Example
/// ```ignore
/// let mut store = Store::from_block(&root);
/// let inc = root.actions().at_path(&["counter"]).unwrap().creator("inc");
/// assert!(store.dispatch(inc.act()));
/// ```
pub struct Store {
    state: Value,
    reducer: BlockReducer,
}

impl Store {
    /// Initialize from a block: state comes from reducing absent state
    /// with the synthetic [`INIT_TYPE`] action, which lands every slice on
    /// its initial value.
    pub fn from_block(block: &Block) -> Self {
        let reducer = block.reducer().clone();
        let state = reducer(None, &ActionDescriptor::new(INIT_TYPE));
        Self { state, reducer }
    }

    /// Dispatch an action. Returns whether state changed, judged by
    /// [`Value::same`] on the old and new roots.
    pub fn dispatch(&mut self, action: ActionDescriptor) -> bool {
        let next = (self.reducer)(Some(&self.state), &action);
        let changed = !Value::same(&self.state, &next);
        self.state = next;
        changed
    }

    /// The current state.
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Replace the state wholesale. Prefer dispatching actions; this is
    /// for restoring a snapshot at startup.
    pub fn set_state(&mut self, state: Value) {
        self.state = state;
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("state", &self.state).finish()
    }
}

/// A [`Store`] with a middleware chain around each dispatch.
pub struct StoreWithMiddleware<M: Middleware<ActionDescriptor>> {
    store: Store,
    middleware: M,
}

impl<M: Middleware<ActionDescriptor>> StoreWithMiddleware<M> {
    /// Initialize from a block, wrapping dispatches with `middleware`.
    /// The init reduction happens directly, not through the chain.
    pub fn from_block(block: &Block, middleware: M) -> Self {
        Self {
            store: Store::from_block(block),
            middleware,
        }
    }

    /// Dispatch through the middleware chain, then the reducer. The chain
    /// cannot swallow the action.
    pub fn dispatch(&mut self, action: ActionDescriptor) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    pub fn state(&self) -> &Value {
        self.store.state()
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

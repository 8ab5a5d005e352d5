//! Test utilities for block-based stores
//!
//! - [`RecordingMiddleware`]: remembers every dispatched action name and
//!   whether the reducer changed state, for asserting on dispatch traffic.
//! - [`effect_probe`]: an effect handler paired with a shared log of the
//!   payload sequences it received.
//!
//! # Example
//!
//! ```ignore
//! let (probe, log) = effect_probe();
//! // ...register `probe` in a block's effects factory, dispatch...
//! assert_eq!(*log.lock().unwrap(), [vec![Value::from(1)]]);
//! ```

use std::sync::{Arc, Mutex};

use crate::block::EffectHandler;
use crate::store::{Action, Middleware};
use crate::value::Value;

/// Middleware that records dispatch traffic for assertions.
#[derive(Debug, Default)]
pub struct RecordingMiddleware {
    seen: Vec<String>,
    outcomes: Vec<(String, bool)>,
}

impl RecordingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action names seen by `before`, in dispatch order.
    pub fn seen(&self) -> &[String] {
        &self.seen
    }

    /// `(name, state_changed)` pairs seen by `after`, in dispatch order.
    pub fn outcomes(&self) -> &[(String, bool)] {
        &self.outcomes
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.outcomes.clear();
    }
}

impl<A: Action> Middleware<A> for RecordingMiddleware {
    fn before(&mut self, action: &A) {
        self.seen.push(action.name().to_string());
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        self.outcomes.push((action.name().to_string(), state_changed));
    }
}

/// The payload sequences an [`effect_probe`] handler has received.
pub type EffectLog = Arc<Mutex<Vec<Vec<Value>>>>;

/// An effect handler that records every payload sequence it is invoked
/// with, plus the shared log to assert against.
pub fn effect_probe() -> (EffectHandler, EffectLog) {
    let log: EffectLog = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let handler: EffectHandler = Arc::new(move |args: &[Value]| {
        sink.lock().unwrap().push(args.to_vec());
    });
    (handler, log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_probe_records_in_order() {
        let (probe, log) = effect_probe();
        probe(&[Value::from(1)]);
        probe(&[]);
        assert_eq!(*log.lock().unwrap(), [vec![Value::from(1)], vec![]]);
    }
}

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::keys::PropertyKey;

/// Handle returned by [`PropertyModel::on_change`]; pass to `off` to release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(pub u64);

/// Per-key change callback; receives the committed value.
pub type ChangeHandler = Box<dyn Fn(&Value)>;

/// Observable key/value store owned by the host environment.
///
/// The bridge never owns the model: it reads current values, writes event
/// payloads back, and observes per-key changes. Values are loosely typed on
/// the wire (`serde_json::Value`); the bridge deserializes into typed
/// configuration on read.
///
/// Handlers for a single key fire in delivery order. Ordering across
/// different keys is not part of the contract.
pub trait PropertyModel {
    /// Current value of `key`, or `None` when the host never set it.
    fn get(&self, key: PropertyKey) -> Option<Value>;

    /// Stages a new value for `key`. Takes effect for `get` immediately;
    /// change handlers fire on the next `commit`.
    fn set(&self, key: PropertyKey, value: Value);

    /// Delivers change notifications for every key written since the last
    /// commit, in write order.
    fn commit(&self);

    /// Registers a change handler for `key`.
    fn on_change(&self, key: PropertyKey, handler: ChangeHandler) -> SubscriptionToken;

    /// Releases a handler. Unknown or already-released tokens are ignored.
    fn off(&self, token: SubscriptionToken);
}

struct HandlerEntry {
    token: SubscriptionToken,
    key: PropertyKey,
    callback: ChangeHandler,
}

/// In-process [`PropertyModel`] for hosts without their own transport, and
/// for the test suite.
///
/// A `set` to the current value is a no-op, matching observable-property
/// semantics of the host transports this models: handlers only see actual
/// changes.
#[derive(Default)]
pub struct MemoryPropertyModel {
    values: RefCell<IndexMap<PropertyKey, Value>>,
    dirty: RefCell<Vec<PropertyKey>>,
    handlers: RefCell<Vec<HandlerEntry>>,
    next_token: Cell<u64>,
}

impl MemoryPropertyModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for `set` + `commit` in one step.
    pub fn write(&self, key: PropertyKey, value: Value) {
        self.set(key, value);
        self.commit();
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl PropertyModel for MemoryPropertyModel {
    fn get(&self, key: PropertyKey) -> Option<Value> {
        self.values.borrow().get(&key).cloned()
    }

    fn set(&self, key: PropertyKey, value: Value) {
        let mut values = self.values.borrow_mut();
        if values.get(&key) == Some(&value) {
            return;
        }
        values.insert(key, value);
        let mut dirty = self.dirty.borrow_mut();
        if !dirty.contains(&key) {
            dirty.push(key);
        }
    }

    fn commit(&self) {
        let changed = std::mem::take(&mut *self.dirty.borrow_mut());
        for key in changed {
            let value = self
                .values
                .borrow()
                .get(&key)
                .cloned()
                .unwrap_or(Value::Null);
            trace!(key = key.as_str(), "delivering property change");
            let handlers = self.handlers.borrow();
            for entry in handlers.iter().filter(|entry| entry.key == key) {
                (entry.callback)(&value);
            }
        }
    }

    fn on_change(&self, key: PropertyKey, handler: ChangeHandler) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.handlers.borrow_mut().push(HandlerEntry {
            token,
            key,
            callback: handler,
        });
        token
    }

    fn off(&self, token: SubscriptionToken) {
        self.handlers
            .borrow_mut()
            .retain(|entry| entry.token != token);
    }
}

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::keys::PropertyKey;

/// Kind of pointer interaction reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Mouseover,
    Mouseout,
    Click,
}

impl InteractionKind {
    /// The property-model field reserved for this event kind.
    #[must_use]
    pub const fn model_key(self) -> PropertyKey {
        match self {
            Self::Mouseover => PropertyKey::MouseoverEvent,
            Self::Mouseout => PropertyKey::MouseoutEvent,
            Self::Click => PropertyKey::ClickEvent,
        }
    }
}

/// Engine-originated interaction payload (`{subject, residue, chain, ...}`),
/// relayed verbatim into the property model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub data: Value,
}

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelToken(u64);

type EventHandler = Box<dyn Fn(&InteractionEvent)>;

/// In-process interaction bus standing in for the engine's process-wide
/// event channel.
///
/// The original delivered these through a global document-level listener that
/// was never removed; here the subscription is an explicit object the bridge
/// registers at mount and releases at disposal.
#[derive(Default)]
pub struct EventChannel {
    handlers: RefCell<Vec<(ChannelToken, EventHandler)>>,
    next_token: Cell<u64>,
}

impl EventChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: EventHandler) -> ChannelToken {
        let token = ChannelToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.handlers.borrow_mut().push((token, handler));
        token
    }

    /// Releases a subscription. Unknown tokens are ignored.
    pub fn unsubscribe(&self, token: ChannelToken) {
        self.handlers
            .borrow_mut()
            .retain(|(existing, _)| *existing != token);
    }

    /// Delivers `event` to every live subscriber in registration order.
    pub fn emit(&self, event: &InteractionEvent) {
        let handlers = self.handlers.borrow();
        for (_, handler) in handlers.iter() {
            handler(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

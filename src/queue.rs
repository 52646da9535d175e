use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::BridgeResult;

/// Deferred engine call run once, on the first readiness signal.
pub type OneShotCommand<E> = Box<dyn FnOnce(&mut E) -> BridgeResult<()>>;

/// Deferred engine call re-run on every readiness signal.
pub type RecurringCommand<E> = Box<dyn FnMut(&mut E) -> BridgeResult<()>>;

/// Visual state reasserted after every (re)initialization of the engine.
///
/// Slots run in declaration order. A slot holds the latest command only:
/// reassertion replays state, not the event history that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringSlot {
    Spin,
    Visibility,
    SelectionColoring,
}

impl RecurringSlot {
    const ORDER: [Self; 3] = [Self::Spin, Self::Visibility, Self::SelectionColoring];

    const fn index(self) -> usize {
        match self {
            Self::Spin => 0,
            Self::Visibility => 1,
            Self::SelectionColoring => 2,
        }
    }
}

/// Gates engine-bound calls behind the asynchronous readiness signal.
///
/// One-shot commands accumulate in registration order and drain exactly once;
/// recurring commands re-run on every readiness signal, including ones that
/// follow a full reload. A command failure is logged and never stops the
/// drain: replay must deliver every remaining command.
pub struct CommandQueue<E: Engine> {
    one_shot: Vec<(&'static str, OneShotCommand<E>)>,
    recurring: [Option<(&'static str, RecurringCommand<E>)>; 3],
    drained: bool,
}

impl<E: Engine> Default for CommandQueue<E> {
    fn default() -> Self {
        Self {
            one_shot: Vec::new(),
            recurring: [None, None, None],
            drained: false,
        }
    }
}

impl<E: Engine> CommandQueue<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_one_shot(&mut self, name: &'static str, command: OneShotCommand<E>) {
        debug!(call = name, "queueing engine call until readiness");
        self.one_shot.push((name, command));
    }

    /// Stores or replaces the recurring command for `slot`.
    pub fn set_recurring(&mut self, slot: RecurringSlot, name: &'static str, command: RecurringCommand<E>) {
        self.recurring[slot.index()] = Some((name, command));
    }

    #[must_use]
    pub fn one_shot_len(&self) -> usize {
        self.one_shot.len()
    }

    #[must_use]
    pub fn has_drained(&self) -> bool {
        self.drained
    }

    /// Runs the queued one-shot commands in registration order, once ever.
    pub fn drain_one_shot(&mut self, engine: &mut E) {
        if self.drained {
            return;
        }
        self.drained = true;
        let pending = std::mem::take(&mut self.one_shot);
        debug!(count = pending.len(), "draining deferred engine calls");
        for (name, command) in pending {
            if let Err(err) = command(engine) {
                warn!(call = name, %err, "deferred engine call failed");
            }
        }
    }

    /// Re-runs every recurring command in slot order.
    pub fn run_recurring(&mut self, engine: &mut E) {
        for slot in RecurringSlot::ORDER {
            if let Some((name, command)) = self.recurring[slot.index()].as_mut() {
                if let Err(err) = command(engine) {
                    warn!(call = name, %err, "recurring engine call failed");
                }
            }
        }
    }

    /// Drops all pending and recurring commands; used at disposal.
    pub fn clear(&mut self) {
        self.one_shot.clear();
        self.recurring = [None, None, None];
    }
}

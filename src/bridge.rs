use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::color::normalize_color;
use crate::config::ViewerConfig;
use crate::engine::{Engine, EngineConnector};
use crate::error::{BridgeError, BridgeResult};
use crate::events::{ChannelToken, EventChannel};
use crate::keys::{Binding, PropertyKey, TargetedOp};
use crate::model::{PropertyModel, SubscriptionToken};
use crate::params::{ColorPair, QueryParam, ResetParams, SelectParams, TooltipParams};
use crate::queue::{CommandQueue, RecurringSlot};
use crate::resources::ResourceStore;
use crate::visibility::HideFlags;

/// Lifecycle of one bridge instance.
///
/// `Disposed` and `Failed` are terminal: property changes and readiness
/// signals delivered afterwards are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    Constructed,
    Mounted,
    AwaitingReady,
    Ready,
    Disposed,
    Failed,
}

/// One handler registration owned by this bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub key: PropertyKey,
    pub token: SubscriptionToken,
}

struct BridgeInner<M: PropertyModel, E: Engine> {
    model: Rc<M>,
    channel: Rc<EventChannel>,
    phase: BridgePhase,
    engine: Option<E>,
    queue: CommandQueue<E>,
    resources: ResourceStore,
    subscriptions: Vec<SubscriptionRecord>,
    channel_token: Option<ChannelToken>,
    failure: Option<BridgeError>,
}

/// Synchronization bridge between a host-owned property model and one
/// asynchronously-constructed viewer engine instance.
///
/// The bridge observes the model (one handler per declared key), derives
/// configuration snapshots, defers engine calls until readiness, and relays
/// engine-originated interaction events back into the model. It exclusively
/// owns the engine handle; the model stays host-owned.
pub struct ViewerBridge<M: PropertyModel + 'static, E: Engine + 'static> {
    inner: Rc<RefCell<BridgeInner<M, E>>>,
}

impl<M: PropertyModel + 'static, E: Engine + 'static> ViewerBridge<M, E> {
    #[must_use]
    pub fn new(model: Rc<M>, channel: Rc<EventChannel>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BridgeInner {
                model,
                channel,
                phase: BridgePhase::Constructed,
                engine: None,
                queue: CommandQueue::new(),
                resources: ResourceStore::new(),
                subscriptions: Vec::new(),
                channel_token: None,
                failure: None,
            })),
        }
    }

    /// Builds the initial snapshot, issues the asynchronous construction
    /// request, and registers every subscription this bridge owns.
    ///
    /// On success the bridge is `AwaitingReady`; the host completes the
    /// handshake with [`engine_ready`](Self::engine_ready) or
    /// [`engine_failed`](Self::engine_failed).
    pub fn mount(&self, connector: &mut dyn EngineConnector) -> BridgeResult<()> {
        let inner = &mut *self.inner.borrow_mut();
        if inner.phase != BridgePhase::Constructed {
            return Err(BridgeError::InvalidPhase {
                phase: inner.phase,
                action: "mount",
            });
        }
        inner.phase = BridgePhase::Mounted;

        let snapshot = ViewerConfig::from_model(&*inner.model, &mut inner.resources);
        if let Err(err) = connector.construct(&snapshot) {
            inner.phase = BridgePhase::Failed;
            inner.failure = Some(err.clone());
            return Err(err);
        }

        for key in PropertyKey::SUBSCRIBED {
            let weak = Rc::downgrade(&self.inner);
            let token = inner.model.on_change(
                key,
                Box::new(move |value| {
                    if let Some(cell) = weak.upgrade() {
                        cell.borrow_mut().on_property_change(key, value);
                    }
                }),
            );
            inner.subscriptions.push(SubscriptionRecord { key, token });
        }

        let weak = Rc::downgrade(&self.inner);
        let token = inner.channel.subscribe(Box::new(move |event| {
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let model = {
                let inner = cell.borrow();
                if matches!(inner.phase, BridgePhase::Disposed | BridgePhase::Failed) {
                    return;
                }
                Rc::clone(&inner.model)
            };
            model.set(event.kind.model_key(), event.data.clone());
            model.commit();
        }));
        inner.channel_token = Some(token);

        inner.phase = BridgePhase::AwaitingReady;
        info!("bridge mounted; awaiting engine readiness");
        Ok(())
    }

    /// First readiness signal: takes ownership of the engine handle, drains
    /// the one-shot queue in registration order, then asserts recurring
    /// visual state.
    ///
    /// A stale signal arriving after disposal is a no-op.
    pub fn engine_ready(&self, engine: E) {
        let inner = &mut *self.inner.borrow_mut();
        match inner.phase {
            BridgePhase::AwaitingReady => {
                inner.engine = Some(engine);
                inner.phase = BridgePhase::Ready;
                info!("engine ready; replaying deferred calls");
                if let Some(live) = inner.engine.as_mut() {
                    inner.queue.drain_one_shot(live);
                    inner.queue.run_recurring(live);
                }
            }
            BridgePhase::Disposed => debug!("readiness signal after disposal ignored"),
            phase => warn!(?phase, "unexpected readiness signal ignored"),
        }
    }

    /// Later readiness signal, after a full reload: re-asserts recurring
    /// visual state against the live handle.
    pub fn engine_reloaded(&self) {
        let inner = &mut *self.inner.borrow_mut();
        match inner.phase {
            BridgePhase::Ready => {
                debug!("engine reloaded; reasserting visual state");
                if let Some(live) = inner.engine.as_mut() {
                    inner.queue.run_recurring(live);
                }
            }
            BridgePhase::Disposed => debug!("reload signal after disposal ignored"),
            phase => warn!(?phase, "unexpected reload signal ignored"),
        }
    }

    /// Engine construction failed: the bridge stops handling changes and
    /// carries the error instead of waiting for readiness forever.
    pub fn engine_failed(&self, error: BridgeError) {
        let inner = &mut *self.inner.borrow_mut();
        if inner.phase == BridgePhase::Disposed {
            return;
        }
        warn!(%error, "engine construction failed");
        inner.phase = BridgePhase::Failed;
        inner.failure = Some(error);
        inner.queue.clear();
        inner.engine = None;
    }

    /// Releases every subscription this bridge registered, the interaction
    /// channel listener, the engine handle, and all materialized resources.
    ///
    /// Idempotent: any call after the first changes nothing.
    pub fn dispose(&self) {
        let inner = &mut *self.inner.borrow_mut();
        if inner.phase == BridgePhase::Disposed {
            return;
        }
        for record in inner.subscriptions.drain(..) {
            inner.model.off(record.token);
        }
        if let Some(token) = inner.channel_token.take() {
            inner.channel.unsubscribe(token);
        }
        inner.queue.clear();
        inner.engine = None;
        inner.resources.clear();
        inner.phase = BridgePhase::Disposed;
        info!("bridge disposed");
    }

    #[must_use]
    pub fn phase(&self) -> BridgePhase {
        self.inner.borrow().phase
    }

    /// The construction error carried by a `Failed` bridge.
    #[must_use]
    pub fn failure(&self) -> Option<BridgeError> {
        self.inner.borrow().failure.clone()
    }

    /// One-shot commands still gated behind readiness.
    #[must_use]
    pub fn pending_command_count(&self) -> usize {
        self.inner.borrow().queue.one_shot_len()
    }

    /// Payload resources currently materialized for snapshots.
    #[must_use]
    pub fn live_resource_count(&self) -> usize {
        self.inner.borrow().resources.live_count()
    }

    /// Subscriptions this bridge instance currently owns on the model.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }
}

impl<M: PropertyModel + 'static, E: Engine + 'static> Drop for ViewerBridge<M, E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<M: PropertyModel, E: Engine> BridgeInner<M, E> {
    fn on_property_change(&mut self, key: PropertyKey, value: &Value) {
        match self.phase {
            BridgePhase::Disposed | BridgePhase::Failed | BridgePhase::Constructed => return,
            _ => {}
        }
        debug!(key = key.as_str(), "property change");
        match key.binding() {
            Binding::Reconfigure { full_load } => {
                let snapshot = ViewerConfig::from_model(&*self.model, &mut self.resources);
                self.run_or_queue("reconfigure", move |engine| {
                    engine.reconfigure(&snapshot, full_load)
                });
            }
            Binding::Targeted(op) => self.dispatch_targeted(op, value),
        }
    }

    fn dispatch_targeted(&mut self, op: TargetedOp, value: &Value) {
        match op {
            TargetedOp::Spin => {
                let on = value.as_bool().unwrap_or(false);
                self.assert_recurring(
                    RecurringSlot::Spin,
                    "toggle_spin",
                    Box::new(move |engine| engine.toggle_spin(on)),
                );
            }
            TargetedOp::Visibility => {
                let map = HideFlags::from_model(&*self.model).visibility_map();
                self.assert_recurring(
                    RecurringSlot::Visibility,
                    "set_visibility",
                    Box::new(move |engine| engine.set_visibility(&map)),
                );
            }
            TargetedOp::BackgroundColor => {
                if let Some(color) = normalize_color(value.as_str()) {
                    self.run_or_queue("set_background_color", move |engine| {
                        engine.set_background_color(color)
                    });
                }
            }
            TargetedOp::HighlightColor => {
                if let Some(color) = normalize_color(value.as_str()) {
                    let colors = ColorPair::highlight_only(color);
                    self.run_or_queue("set_color", move |engine| engine.set_color(&colors));
                }
            }
            TargetedOp::SelectColor => {
                if let Some(color) = normalize_color(value.as_str()) {
                    let colors = ColorPair::select_only(color);
                    self.run_or_queue("set_color", move |engine| engine.set_color(&colors));
                }
            }
            TargetedOp::Focus => {
                if let Some(targets) = parse_payload::<Vec<QueryParam>>(PropertyKey::Focus, value) {
                    self.run_or_queue("focus", move |engine| engine.focus(&targets));
                }
            }
            TargetedOp::Highlight => {
                if let Some(target) = parse_payload::<QueryParam>(PropertyKey::Highlight, value) {
                    self.run_or_queue("highlight", move |engine| engine.highlight(&target));
                }
            }
            TargetedOp::ClearHighlight => {
                // Toggle channel: every committed flip is one clear request.
                self.run_or_queue("clear_highlight", |engine| engine.clear_highlight());
            }
            TargetedOp::SelectionColoring => {
                if let Some(params) = parse_payload::<SelectParams>(PropertyKey::ColorData, value) {
                    self.assert_recurring(
                        RecurringSlot::SelectionColoring,
                        "select",
                        Box::new(move |engine| engine.select(&params)),
                    );
                }
            }
            TargetedOp::ClearSelection => {
                let structure_number = self
                    .model
                    .get(PropertyKey::Args)
                    .and_then(|args| args.get("number").cloned())
                    .and_then(|number| number.as_i64())
                    .map(|number| number as i32);
                self.run_or_queue("clear_selection", move |engine| {
                    engine.clear_selection(structure_number)
                });
            }
            TargetedOp::Tooltips => {
                if let Some(params) = parse_payload::<TooltipParams>(PropertyKey::Tooltips, value) {
                    self.run_or_queue("set_tooltips", move |engine| engine.set_tooltips(&params));
                }
            }
            TargetedOp::ClearTooltips => {
                self.run_or_queue("clear_tooltips", |engine| engine.clear_tooltips());
            }
            TargetedOp::ColorPair => {
                if let Some(colors) = parse_payload::<ColorPair>(PropertyKey::SetColor, value) {
                    if !colors.is_empty() {
                        self.run_or_queue("set_color", move |engine| engine.set_color(&colors));
                    }
                }
            }
            TargetedOp::Reset => {
                if let Some(params) = parse_payload::<ResetParams>(PropertyKey::Reset, value) {
                    self.run_or_queue("reset", move |engine| engine.reset(&params));
                }
            }
        }
    }

    /// Runs `call` immediately when the engine is live; queues it as a
    /// one-shot command otherwise.
    fn run_or_queue<F>(&mut self, name: &'static str, call: F)
    where
        F: FnOnce(&mut E) -> BridgeResult<()> + 'static,
    {
        if self.phase == BridgePhase::Ready {
            if let Some(engine) = self.engine.as_mut() {
                if let Err(err) = call(engine) {
                    warn!(call = name, %err, "engine call failed");
                }
                return;
            }
        }
        self.queue.push_one_shot(name, Box::new(call));
    }

    /// Stores `call` in its recurring slot (latest state wins) and, when the
    /// engine is live, applies it immediately.
    fn assert_recurring(
        &mut self,
        slot: RecurringSlot,
        name: &'static str,
        mut call: Box<dyn FnMut(&mut E) -> BridgeResult<()>>,
    ) {
        if self.phase == BridgePhase::Ready {
            if let Some(engine) = self.engine.as_mut() {
                if let Err(err) = call(engine) {
                    warn!(call = name, %err, "engine call failed");
                }
            }
        }
        self.queue.set_recurring(slot, name, call);
    }
}

/// Deserializes a command payload; `null` (the pulse reset) and malformed
/// payloads are dropped without failing the bridge.
fn parse_payload<T: DeserializeOwned>(key: PropertyKey, value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(key = key.as_str(), %err, "ignoring malformed command payload");
            None
        }
    }
}

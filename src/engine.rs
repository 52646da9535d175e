use std::cell::RefCell;
use std::rc::Rc;

use crate::color::Rgb;
use crate::config::ViewerConfig;
use crate::error::BridgeResult;
use crate::params::{ColorPair, QueryParam, ResetParams, SelectParams, TooltipParams};
use crate::visibility::VisibilityMap;

/// Capability set of a running viewer instance.
///
/// The handle is exclusively owned by one bridge and invalid to invoke before
/// the first readiness signal; the bridge's command queue enforces that.
pub trait Engine {
    fn set_visibility(&mut self, map: &VisibilityMap) -> BridgeResult<()>;
    fn select(&mut self, params: &SelectParams) -> BridgeResult<()>;
    fn focus(&mut self, targets: &[QueryParam]) -> BridgeResult<()>;
    fn highlight(&mut self, target: &QueryParam) -> BridgeResult<()>;
    fn clear_highlight(&mut self) -> BridgeResult<()>;
    fn clear_selection(&mut self, structure_number: Option<i32>) -> BridgeResult<()>;
    fn set_color(&mut self, colors: &ColorPair) -> BridgeResult<()>;
    fn toggle_spin(&mut self, on: bool) -> BridgeResult<()>;
    fn reset(&mut self, params: &ResetParams) -> BridgeResult<()>;
    fn reconfigure(&mut self, config: &ViewerConfig, full_load: bool) -> BridgeResult<()>;
    fn set_background_color(&mut self, color: Rgb) -> BridgeResult<()>;
    fn clear_tooltips(&mut self) -> BridgeResult<()>;
    fn set_tooltips(&mut self, params: &TooltipParams) -> BridgeResult<()>;
}

/// Issues the asynchronous engine-construction request at mount time.
///
/// Construction completes outside the bridge; the host delivers the outcome
/// through `ViewerBridge::engine_ready` or `ViewerBridge::engine_failed`.
pub trait EngineConnector {
    fn construct(&mut self, config: &ViewerConfig) -> BridgeResult<()>;
}

/// One recorded capability invocation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetVisibility(VisibilityMap),
    Select(SelectParams),
    Focus(Vec<QueryParam>),
    Highlight(QueryParam),
    ClearHighlight,
    ClearSelection(Option<i32>),
    SetColor(ColorPair),
    ToggleSpin(bool),
    Reset(ResetParams),
    Reconfigure {
        config: Box<ViewerConfig>,
        full_load: bool,
    },
    SetBackgroundColor(Rgb),
    ClearTooltips,
    SetTooltips(TooltipParams),
}

/// Shared, inspectable call log of a [`RecordingEngine`].
pub type CallLog = Rc<RefCell<Vec<EngineCall>>>;

/// No-op engine used by tests and headless bridge usage; records every
/// capability call in order.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: CallLog,
}

impl RecordingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the shared log; stays readable after the engine moves into
    /// the bridge.
    #[must_use]
    pub fn call_log(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    fn record(&mut self, call: EngineCall) -> BridgeResult<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Engine for RecordingEngine {
    fn set_visibility(&mut self, map: &VisibilityMap) -> BridgeResult<()> {
        self.record(EngineCall::SetVisibility(map.clone()))
    }

    fn select(&mut self, params: &SelectParams) -> BridgeResult<()> {
        self.record(EngineCall::Select(params.clone()))
    }

    fn focus(&mut self, targets: &[QueryParam]) -> BridgeResult<()> {
        self.record(EngineCall::Focus(targets.to_vec()))
    }

    fn highlight(&mut self, target: &QueryParam) -> BridgeResult<()> {
        self.record(EngineCall::Highlight(target.clone()))
    }

    fn clear_highlight(&mut self) -> BridgeResult<()> {
        self.record(EngineCall::ClearHighlight)
    }

    fn clear_selection(&mut self, structure_number: Option<i32>) -> BridgeResult<()> {
        self.record(EngineCall::ClearSelection(structure_number))
    }

    fn set_color(&mut self, colors: &ColorPair) -> BridgeResult<()> {
        self.record(EngineCall::SetColor(*colors))
    }

    fn toggle_spin(&mut self, on: bool) -> BridgeResult<()> {
        self.record(EngineCall::ToggleSpin(on))
    }

    fn reset(&mut self, params: &ResetParams) -> BridgeResult<()> {
        self.record(EngineCall::Reset(*params))
    }

    fn reconfigure(&mut self, config: &ViewerConfig, full_load: bool) -> BridgeResult<()> {
        self.record(EngineCall::Reconfigure {
            config: Box::new(config.clone()),
            full_load,
        })
    }

    fn set_background_color(&mut self, color: Rgb) -> BridgeResult<()> {
        self.record(EngineCall::SetBackgroundColor(color))
    }

    fn clear_tooltips(&mut self) -> BridgeResult<()> {
        self.record(EngineCall::ClearTooltips)
    }

    fn set_tooltips(&mut self, params: &TooltipParams) -> BridgeResult<()> {
        self.record(EngineCall::SetTooltips(params.clone()))
    }
}

/// Connector that records the construction request instead of building a
/// viewer; the test suite pairs it with [`RecordingEngine`].
#[derive(Debug, Default)]
pub struct NullConnector {
    pub requested: Vec<ViewerConfig>,
    pub fail_with: Option<String>,
}

impl NullConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            requested: Vec::new(),
            fail_with: Some(message.into()),
        }
    }
}

impl EngineConnector for NullConnector {
    fn construct(&mut self, config: &ViewerConfig) -> BridgeResult<()> {
        if let Some(message) = &self.fail_with {
            return Err(crate::error::BridgeError::Construction(message.clone()));
        }
        self.requested.push(config.clone());
        Ok(())
    }
}

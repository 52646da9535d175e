use std::rc::Rc;

use molbridge::bridge::{BridgePhase, ViewerBridge};
use molbridge::color::Rgb;
use molbridge::engine::{CallLog, EngineCall, NullConnector, RecordingEngine};
use molbridge::error::BridgeError;
use molbridge::events::EventChannel;
use molbridge::keys::PropertyKey;
use molbridge::model::{MemoryPropertyModel, PropertyModel};
use molbridge::visibility::HideFlags;
use serde_json::json;

struct Harness {
    model: Rc<MemoryPropertyModel>,
    channel: Rc<EventChannel>,
    bridge: ViewerBridge<MemoryPropertyModel, RecordingEngine>,
}

fn mounted_bridge() -> Harness {
    let model = Rc::new(MemoryPropertyModel::new());
    let channel = Rc::new(EventChannel::new());
    let bridge = ViewerBridge::new(Rc::clone(&model), Rc::clone(&channel));
    bridge.mount(&mut NullConnector::new()).expect("mount");
    Harness {
        model,
        channel,
        bridge,
    }
}

fn signal_ready(bridge: &ViewerBridge<MemoryPropertyModel, RecordingEngine>) -> CallLog {
    let engine = RecordingEngine::new();
    let log = engine.call_log();
    bridge.engine_ready(engine);
    log
}

#[test]
fn mount_requests_construction_with_the_initial_snapshot() {
    let model = Rc::new(MemoryPropertyModel::new());
    model.write(PropertyKey::MoleculeId, json!("1qyn"));

    let channel = Rc::new(EventChannel::new());
    let bridge: ViewerBridge<_, RecordingEngine> =
        ViewerBridge::new(Rc::clone(&model), Rc::clone(&channel));

    let mut connector = NullConnector::new();
    bridge.mount(&mut connector).expect("mount");

    assert_eq!(bridge.phase(), BridgePhase::AwaitingReady);
    assert_eq!(connector.requested.len(), 1);
    assert_eq!(connector.requested[0].molecule_id.as_deref(), Some("1qyn"));
    assert_eq!(
        bridge.subscription_count(),
        PropertyKey::SUBSCRIBED.len(),
        "one handler per declared key"
    );
    assert_eq!(channel.subscriber_count(), 1, "relay registered at mount");
}

#[test]
fn mount_twice_is_an_invalid_phase() {
    let harness = mounted_bridge();
    let err = harness
        .bridge
        .mount(&mut NullConnector::new())
        .expect_err("second mount");
    assert!(matches!(err, BridgeError::InvalidPhase { .. }));
}

#[test]
fn construction_failure_moves_the_bridge_to_failed() {
    let model = Rc::new(MemoryPropertyModel::new());
    let channel = Rc::new(EventChannel::new());
    let bridge: ViewerBridge<_, RecordingEngine> =
        ViewerBridge::new(Rc::clone(&model), Rc::clone(&channel));

    let err = bridge
        .mount(&mut NullConnector::failing("no webgl"))
        .expect_err("construction fails");
    assert_eq!(err, BridgeError::Construction("no webgl".to_owned()));
    assert_eq!(bridge.phase(), BridgePhase::Failed);
    assert_eq!(bridge.failure(), Some(err));

    // A failed bridge ignores further property changes.
    model.write(PropertyKey::BgColor, json!("red"));
    assert_eq!(bridge.pending_command_count(), 0);
}

#[test]
fn async_construction_failure_moves_the_bridge_to_failed() {
    let harness = mounted_bridge();
    harness
        .bridge
        .engine_failed(BridgeError::Construction("context lost".to_owned()));

    assert_eq!(harness.bridge.phase(), BridgePhase::Failed);
    harness.model.write(PropertyKey::Spin, json!(true));
    assert_eq!(harness.bridge.pending_command_count(), 0);
}

#[test]
fn background_color_set_before_readiness_arrives_once_on_readiness() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::BgColor, json!("red"));
    assert_eq!(harness.bridge.pending_command_count(), 1);

    let log = signal_ready(&harness.bridge);
    assert_eq!(
        log.borrow().as_slice(),
        &[EngineCall::SetBackgroundColor(Rgb::new(255, 0, 0))]
    );

    // A later readiness signal does not replay one-shot commands.
    harness.bridge.engine_reloaded();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn queued_commands_replay_in_registration_order() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::BgColor, json!("#000000"));
    harness.model.write(PropertyKey::ClearHighlight, json!(true));
    harness.model.write(PropertyKey::BgColor, json!("#ffffff"));

    let log = signal_ready(&harness.bridge);
    assert_eq!(
        log.borrow().as_slice(),
        &[
            EngineCall::SetBackgroundColor(Rgb::new(0, 0, 0)),
            EngineCall::ClearHighlight,
            EngineCall::SetBackgroundColor(Rgb::new(255, 255, 255)),
        ]
    );
}

#[test]
fn no_engine_call_happens_before_readiness() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::BgColor, json!("red"));
    harness.model.write(PropertyKey::Spin, json!(true));
    harness.model.write(PropertyKey::MoleculeId, json!("4hhb"));

    // Still AwaitingReady: nothing has reached any engine.
    assert_eq!(harness.bridge.phase(), BridgePhase::AwaitingReady);

    let log = signal_ready(&harness.bridge);
    assert!(!log.borrow().is_empty());
}

#[test]
fn spin_state_is_reasserted_on_every_readiness_signal() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::Spin, json!(true));

    let log = signal_ready(&harness.bridge);
    assert_eq!(log.borrow().as_slice(), &[EngineCall::ToggleSpin(true)]);

    harness.bridge.engine_reloaded();
    assert_eq!(
        log.borrow().as_slice(),
        &[EngineCall::ToggleSpin(true), EngineCall::ToggleSpin(true)]
    );
}

#[test]
fn hide_water_toggle_cycle_asserts_only_the_final_state() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::HideWater, json!(true));
    harness.model.write(PropertyKey::HideWater, json!(false));

    let log = signal_ready(&harness.bridge);

    let expected = HideFlags::default().visibility_map();
    assert_eq!(
        log.borrow().as_slice(),
        &[EngineCall::SetVisibility(expected)],
        "one visibility call with water visible again, no intermediate call"
    );
}

#[test]
fn subject_change_triggers_full_reload_reconfiguration() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::MoleculeId, json!("1qyn"));
    let log = signal_ready(&harness.bridge);
    log.borrow_mut().clear();

    harness.model.write(PropertyKey::MoleculeId, json!("4hhb"));

    let calls = log.borrow();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        EngineCall::Reconfigure { config, full_load } => {
            assert!(*full_load);
            assert_eq!(config.molecule_id.as_deref(), Some("4hhb"));
        }
        other => panic!("expected full-reload reconfigure, got {other:?}"),
    }
}

#[test]
fn chrome_flag_change_reconfigures_without_full_reload() {
    let harness = mounted_bridge();
    let log = signal_ready(&harness.bridge);

    harness.model.write(PropertyKey::SequencePanel, json!(true));

    let calls = log.borrow();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        EngineCall::Reconfigure { config, full_load } => {
            assert!(!*full_load);
            assert!(config.sequence_panel);
        }
        other => panic!("expected reconfigure, got {other:?}"),
    }
}

#[test]
fn disposal_releases_every_subscription_this_bridge_owns() {
    let harness = mounted_bridge();

    // A handler owned by the host must survive the bridge's disposal.
    let host_token = harness
        .model
        .on_change(PropertyKey::MoleculeId, Box::new(|_| {}));

    harness.bridge.dispose();

    assert_eq!(harness.bridge.phase(), BridgePhase::Disposed);
    assert_eq!(harness.model.handler_count(), 1);
    assert_eq!(harness.channel.subscriber_count(), 0);
    harness.model.off(host_token);
}

#[test]
fn model_changes_after_disposal_produce_no_engine_calls() {
    let harness = mounted_bridge();
    let log = signal_ready(&harness.bridge);
    harness.bridge.dispose();

    harness.model.write(PropertyKey::BgColor, json!("red"));
    harness.model.write(PropertyKey::Spin, json!(true));
    harness.model.write(PropertyKey::MoleculeId, json!("4hhb"));

    assert!(log.borrow().is_empty());
    assert_eq!(harness.bridge.pending_command_count(), 0);
}

#[test]
fn double_disposal_matches_single_disposal() {
    let harness = mounted_bridge();
    harness.bridge.dispose();
    let handlers_after_first = harness.model.handler_count();
    let subscribers_after_first = harness.channel.subscriber_count();

    harness.bridge.dispose();

    assert_eq!(harness.bridge.phase(), BridgePhase::Disposed);
    assert_eq!(harness.model.handler_count(), handlers_after_first);
    assert_eq!(harness.channel.subscriber_count(), subscribers_after_first);
}

#[test]
fn disposal_before_readiness_makes_the_readiness_signal_a_no_op() {
    let harness = mounted_bridge();
    harness.model.write(PropertyKey::BgColor, json!("red"));
    harness.bridge.dispose();

    let log = signal_ready(&harness.bridge);

    assert_eq!(harness.bridge.phase(), BridgePhase::Disposed);
    assert!(log.borrow().is_empty());
}

#[test]
fn dropping_the_bridge_disposes_it() {
    let model = Rc::new(MemoryPropertyModel::new());
    let channel = Rc::new(EventChannel::new());
    {
        let bridge: ViewerBridge<_, RecordingEngine> =
            ViewerBridge::new(Rc::clone(&model), Rc::clone(&channel));
        bridge.mount(&mut NullConnector::new()).expect("mount");
        assert_eq!(channel.subscriber_count(), 1);
    }
    assert_eq!(model.handler_count(), 0);
    assert_eq!(channel.subscriber_count(), 0);
}

#[test]
fn disposal_releases_materialized_resources() {
    let harness = mounted_bridge();
    harness.model.write(
        PropertyKey::CustomData,
        json!({"data": "payload", "format": "cif", "binary": false}),
    );
    assert_eq!(harness.bridge.live_resource_count(), 1);

    harness.bridge.dispose();
    assert_eq!(harness.bridge.live_resource_count(), 0);
}

use molbridge::engine::{Engine, EngineCall, RecordingEngine};
use molbridge::error::BridgeError;
use molbridge::queue::{CommandQueue, RecurringSlot};

#[test]
fn one_shot_commands_drain_in_registration_order() {
    let mut queue = CommandQueue::new();
    queue.push_one_shot("spin", Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)));
    queue.push_one_shot("clear", Box::new(|e: &mut RecordingEngine| e.clear_highlight()));
    queue.push_one_shot("spin", Box::new(|e: &mut RecordingEngine| e.toggle_spin(false)));

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.drain_one_shot(&mut engine);

    assert_eq!(
        log.borrow().as_slice(),
        &[
            EngineCall::ToggleSpin(true),
            EngineCall::ClearHighlight,
            EngineCall::ToggleSpin(false),
        ]
    );
}

#[test]
fn one_shot_queue_drains_exactly_once() {
    let mut queue = CommandQueue::new();
    queue.push_one_shot("spin", Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)));

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.drain_one_shot(&mut engine);
    queue.drain_one_shot(&mut engine);

    assert!(queue.has_drained());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn failed_command_does_not_stop_the_drain() {
    let mut queue = CommandQueue::new();
    queue.push_one_shot(
        "boom",
        Box::new(|_: &mut RecordingEngine| Err(BridgeError::Engine("boom".to_owned()))),
    );
    queue.push_one_shot("spin", Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)));

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.drain_one_shot(&mut engine);

    assert_eq!(log.borrow().as_slice(), &[EngineCall::ToggleSpin(true)]);
}

#[test]
fn recurring_slots_run_in_fixed_order() {
    let mut queue = CommandQueue::new();
    queue.set_recurring(
        RecurringSlot::SelectionColoring,
        "select",
        Box::new(|e: &mut RecordingEngine| e.clear_selection(None)),
    );
    queue.set_recurring(
        RecurringSlot::Spin,
        "spin",
        Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)),
    );

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.run_recurring(&mut engine);

    // Spin before selection coloring, regardless of registration order.
    assert_eq!(
        log.borrow().as_slice(),
        &[EngineCall::ToggleSpin(true), EngineCall::ClearSelection(None)]
    );
}

#[test]
fn replacing_a_recurring_slot_keeps_only_the_latest_command() {
    let mut queue = CommandQueue::new();
    queue.set_recurring(
        RecurringSlot::Spin,
        "spin",
        Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)),
    );
    queue.set_recurring(
        RecurringSlot::Spin,
        "spin",
        Box::new(|e: &mut RecordingEngine| e.toggle_spin(false)),
    );

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.run_recurring(&mut engine);

    assert_eq!(log.borrow().as_slice(), &[EngineCall::ToggleSpin(false)]);
}

#[test]
fn recurring_commands_survive_multiple_readiness_signals() {
    let mut queue = CommandQueue::new();
    queue.set_recurring(
        RecurringSlot::Spin,
        "spin",
        Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)),
    );

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.drain_one_shot(&mut engine);
    queue.run_recurring(&mut engine);
    queue.run_recurring(&mut engine);

    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn clear_drops_pending_and_recurring_commands() {
    let mut queue = CommandQueue::new();
    queue.push_one_shot("spin", Box::new(|e: &mut RecordingEngine| e.toggle_spin(true)));
    queue.set_recurring(
        RecurringSlot::Visibility,
        "visibility",
        Box::new(|e: &mut RecordingEngine| e.clear_highlight()),
    );
    assert_eq!(queue.one_shot_len(), 1);

    queue.clear();

    let mut engine = RecordingEngine::new();
    let log = engine.call_log();
    queue.drain_one_shot(&mut engine);
    queue.run_recurring(&mut engine);
    assert!(log.borrow().is_empty());
}

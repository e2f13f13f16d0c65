//! Unit tests for the engine state mapping.

use raywatch::engine::EngineState;

#[test]
fn native_ids_match_engine_contract() {
    assert_eq!(EngineState::Idle.id(), 0);
    assert_eq!(EngineState::Busy.id(), 1);
    assert_eq!(EngineState::Finished.id(), 2);
    assert_eq!(EngineState::Stopped.id(), 3);
}

#[test]
fn only_busy_means_keep_running() {
    for id in 0..=3 {
        let state = EngineState::from_id(id);
        let is_stop_signal = state != EngineState::Busy;
        assert_eq!(is_stop_signal, id != 1);
    }
}

#[test]
fn unknown_ids_read_as_stopped() {
    assert_eq!(EngineState::from_id(7), EngineState::Stopped);
    assert_eq!(EngineState::from_id(i32::MIN), EngineState::Stopped);
}

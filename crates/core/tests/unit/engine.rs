//! # Step Engine Tests
//!
//! Grouped stepping, restart after exhaustion, prefix replay, and the injection
//! target rule.

use nibble_core::common::ReplayError;
use nibble_core::replay::{EngineState, NullObserver, StepEngine};
use nibble_core::trace::Trace;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{GROUPED_LOG, SIX_STEP_LOG};
use crate::common::recorder::{Event, Recorder};

fn loaded(log: &str) -> StepEngine {
    let mut engine = StepEngine::new();
    let _ = engine.load_trace(Trace::parse(log));
    engine
}

#[test]
fn test_idle_engine_refuses_to_replay() {
    let mut engine = StepEngine::new();
    let mut rec = Recorder::new();

    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.step(&mut rec), Err(ReplayError::NoTrace));
    assert_eq!(engine.run_all(&mut rec), Err(ReplayError::NoTrace));
    assert_eq!(engine.replay_to(3, &mut rec), Err(ReplayError::NoTrace));
    assert!(rec.events.is_empty());
}

#[test]
fn test_step_applies_exec_with_its_ram_writes() {
    let mut engine = loaded(GROUPED_LOG);
    let mut rec = Recorder::new();

    assert_eq!(engine.step(&mut rec), Ok(2));
    assert_eq!(engine.position(), 2);
    assert_eq!(rec.take(), vec![Event::Exec(0), Event::Ram(7, 2)]);

    assert_eq!(engine.step(&mut rec), Ok(2));
    assert_eq!(engine.position(), 4);
    assert_eq!(rec.take(), vec![Event::Exec(1), Event::Done]);
    assert_eq!(engine.state(), EngineState::Completed);
}

#[test]
fn test_step_after_completion_restarts() {
    let mut engine = loaded(GROUPED_LOG);
    let mut rec = Recorder::new();
    let _ = engine.run_all(&mut NullObserver).unwrap();

    assert_eq!(engine.step(&mut rec), Ok(2));
    assert_eq!(
        rec.events,
        vec![Event::Restart, Event::Exec(0), Event::Ram(7, 2)]
    );
    assert_eq!(engine.position(), 2);
    assert_eq!(engine.stats().restarts, 1);
}

#[test]
fn test_run_all_applies_every_remaining_record() {
    let mut engine = loaded(SIX_STEP_LOG);
    let mut rec = Recorder::new();
    let _ = engine.step(&mut NullObserver).unwrap();

    assert_eq!(engine.run_all(&mut rec), Ok(4));
    assert_eq!(rec.pcs(), vec![1, 2]);
    assert_eq!(rec.events.last(), Some(&Event::Done));
    assert_eq!(engine.run_all(&mut rec), Ok(0));

    let stats = engine.stats();
    assert_eq!((stats.execs, stats.ram_writes, stats.halts), (3, 2, 1));
    assert_eq!(stats.total(), 6);
}

#[test]
fn test_load_always_rewinds() {
    let mut engine = loaded(SIX_STEP_LOG);
    let _ = engine.run_all(&mut NullObserver).unwrap();

    assert_eq!(
        engine.load_trace(Trace::parse(GROUPED_LOG)),
        EngineState::Positioned(0)
    );
    assert_eq!(engine.stats().total(), 0);
}

#[test]
fn test_empty_trace() {
    let mut engine = loaded("no tagged lines at all\n");
    let mut rec = Recorder::new();

    assert_eq!(engine.state(), EngineState::Completed);
    assert_eq!(engine.run_all(&mut rec), Ok(0));
    assert_eq!(engine.step(&mut rec), Ok(0));
    assert_eq!(rec.events, vec![Event::Restart]);
}

#[test]
fn test_exec_without_ram_writes_is_its_own_group() {
    let mut engine = loaded("[EXEC] PC:0 | Op:AND | Dest:1 | Src:2\n[EXEC] PC:1 | Op:OR | Dest:1 | Src:2\n");
    let mut rec = Recorder::new();

    assert_eq!(engine.step(&mut rec), Ok(1));
    assert_eq!(rec.take(), vec![Event::Exec(0)]);
    assert_eq!(engine.step(&mut rec), Ok(1));
    assert_eq!(rec.take(), vec![Event::Exec(1)]);
}

#[test]
fn test_replay_to_caps_at_trace_length() {
    let mut engine = loaded(GROUPED_LOG);
    let mut rec = Recorder::new();

    assert_eq!(engine.replay_to(99, &mut rec), Ok(4));
    assert_eq!(engine.position(), 4);
    assert_eq!(rec.pcs(), vec![0, 1]);
}

#[test]
fn test_replay_to_reaches_mid_group() {
    let mut engine = loaded(SIX_STEP_LOG);
    let mut rec = Recorder::new();

    assert_eq!(engine.replay_to(3, &mut rec), Ok(3));
    assert_eq!(
        rec.events,
        vec![Event::Exec(0), Event::Ram(1, 3), Event::Exec(1)]
    );
    assert_eq!(engine.state(), EngineState::Positioned(3));
}

#[rstest]
#[case(0, 0)]
#[case(1, 0)]
#[case(2, 1)]
#[case(3, 1)]
#[case(4, 2)]
#[case(5, 2)]
#[case(6, 0)]
fn test_injection_target_pc(#[case] position: usize, #[case] pc: u32) {
    let mut engine = loaded(SIX_STEP_LOG);
    let _ = engine.replay_to(position, &mut NullObserver).unwrap();
    assert_eq!(engine.injection_target_pc(), pc);
}

#[test]
fn test_injection_target_pc_when_idle() {
    assert_eq!(StepEngine::new().injection_target_pc(), 0);
}

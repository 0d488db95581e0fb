mod common;

use std::cell::Cell;
use std::rc::Rc;

use runtime::testing::RecordingActions;
use runtime::{ActionsHandle, Block, BlockError, Condition, Execute, Wait};

use common::{counter, flag};

#[test]
fn execute_fires_on_first_run_not_on_enter() {
    let (count, bump) = counter();
    let mut block = Execute::new(bump);

    block.on_enter().unwrap();
    assert_eq!(count.get(), 0);
    assert!(!block.is_complete());

    block.run(0.016).unwrap();
    assert_eq!(count.get(), 1);
    assert!(block.is_complete());
}

#[test]
fn execute_fires_once_per_activation() {
    let (count, bump) = counter();
    let mut block = Execute::new(bump);

    block.on_enter().unwrap();
    block.run(0.0).unwrap();
    block.run(0.0).unwrap();
    block.run(0.0).unwrap();
    assert_eq!(count.get(), 1);

    block.on_exit();
    block.on_enter().unwrap();
    assert!(!block.is_complete());
    block.run(0.0).unwrap();
    assert_eq!(count.get(), 2);
}

#[test]
fn execute_failure_is_returned_and_not_retried() {
    let attempts = Rc::new(Cell::new(0));
    let mut block = Execute::try_new({
        let attempts = Rc::clone(&attempts);
        move || {
            attempts.set(attempts.get() + 1);
            Err(BlockError::Callback("boom".into()))
        }
    });

    block.on_enter().unwrap();
    let err = block.run(0.0).unwrap_err();
    assert!(matches!(err, BlockError::Callback(ref msg) if msg == "boom"));
    assert!(block.is_complete());

    block.run(0.0).unwrap();
    assert_eq!(attempts.get(), 1);
}

#[test]
fn wait_is_incomplete_until_deadline() {
    let actions = Rc::new(RecordingActions::new());
    actions.set_time(2.0);
    let mut wait = Wait::new(1.5, ActionsHandle::with(actions.clone()));

    wait.on_enter().unwrap();
    for t in [2.0, 2.5, 3.0, 3.49] {
        actions.set_time(t);
        wait.run(0.0).unwrap();
        assert!(!wait.is_complete(), "complete too early at t={}", t);
    }
    for t in [3.5, 4.0, 10.0] {
        actions.set_time(t);
        wait.run(0.0).unwrap();
        assert!(wait.is_complete(), "not complete at t={}", t);
    }
}

#[test]
fn wait_completion_reflects_the_last_run() {
    let actions = Rc::new(RecordingActions::new());
    let mut wait = Wait::new(1.0, ActionsHandle::with(actions.clone()));

    wait.on_enter().unwrap();
    actions.set_time(5.0);
    assert!(!wait.is_complete());

    wait.run(0.0).unwrap();
    assert!(wait.is_complete());
}

#[test]
fn wait_ignores_tick_deltas() {
    let actions = Rc::new(RecordingActions::new());
    let mut wait = Wait::new(1.0, ActionsHandle::with(actions.clone()));

    wait.on_enter().unwrap();
    // Large deltas with a frozen clock never finish the wait.
    for _ in 0..10 {
        wait.run(5.0).unwrap();
    }
    assert!(!wait.is_complete());

    actions.set_time(1.0);
    wait.run(0.0).unwrap();
    assert!(wait.is_complete());
}

#[test]
fn wait_reentry_restarts_from_current_time() {
    let actions = Rc::new(RecordingActions::new());
    let mut wait = Wait::new(1.0, ActionsHandle::with(actions.clone()));

    wait.on_enter().unwrap();
    actions.set_time(1.0);
    wait.run(0.0).unwrap();
    assert!(wait.is_complete());

    wait.on_exit();
    wait.on_enter().unwrap();
    actions.set_time(1.5);
    wait.run(0.0).unwrap();
    assert!(!wait.is_complete());
    assert_eq!(wait.remaining(), 0.5);

    actions.set_time(2.0);
    wait.run(0.0).unwrap();
    assert!(wait.is_complete());
}

#[test]
fn wait_without_actions_fails_loudly() {
    let mut wait = Wait::new(1.0, ActionsHandle::new());
    let err = wait.on_enter().unwrap_err();
    assert!(matches!(err, BlockError::ActionsNotInitialized));
}

#[test]
fn condition_is_a_one_tick_gate() {
    let (open, read) = flag(true);
    let mut gate = Condition::new(read);

    gate.on_enter().unwrap();
    assert!(!gate.is_complete(), "gate must not complete on entry");

    gate.run(0.0).unwrap();
    assert!(gate.is_complete());

    open.set(false);
    gate.on_exit();
    gate.on_enter().unwrap();
    gate.run(0.0).unwrap();
    assert!(!gate.is_complete());

    open.set(true);
    assert!(!gate.is_complete(), "result only changes on run");
    gate.run(0.0).unwrap();
    assert!(gate.is_complete());
}

#[test]
fn condition_polls_once_per_run() {
    let polls = Rc::new(Cell::new(0));
    let mut gate = Condition::new({
        let polls = Rc::clone(&polls);
        move || {
            polls.set(polls.get() + 1);
            false
        }
    });

    gate.on_enter().unwrap();
    assert_eq!(polls.get(), 0);
    for _ in 0..3 {
        gate.run(0.0).unwrap();
        let _ = gate.is_complete();
        let _ = gate.is_complete();
    }
    assert_eq!(polls.get(), 3);
}

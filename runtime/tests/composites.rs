mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use runtime::testing::RecordingActions;
use runtime::{ActionsHandle, Block, BoxedBlock, Execute, LoopKind, Repeat, Sequence, Wait};

use common::{Probe, counter, event_log, events, flag};

fn executes(n: usize, count: &Rc<Cell<u32>>) -> Vec<BoxedBlock> {
    (0..n)
        .map(|_| {
            let count = Rc::clone(count);
            Box::new(Execute::new(move || count.set(count.get() + 1))) as BoxedBlock
        })
        .collect()
}

#[test]
fn sequence_advances_one_execute_per_tick() {
    for n in 1..=6 {
        let count = Rc::new(Cell::new(0));
        let mut seq = Sequence::new(executes(n, &count));
        seq.on_enter().unwrap();

        for tick in 1..=n {
            seq.run(0.016).unwrap();
            assert_eq!(count.get() as usize, tick);
            assert_eq!(seq.is_complete(), tick == n, "n={} tick={}", n, tick);
        }
    }
}

#[test]
fn sequence_wait_then_execute_fires_after_deadline() {
    let actions = Rc::new(RecordingActions::new());
    let clock = ActionsHandle::with(actions.clone());
    let fired_at = Rc::new(RefCell::new(Vec::new()));

    let mut seq = Sequence::new(vec![
        Box::new(Wait::new(1.0, clock.clone())),
        Box::new(Execute::new({
            let fired_at = Rc::clone(&fired_at);
            let clock = clock.clone();
            move || fired_at.borrow_mut().push(clock.current_time().unwrap())
        })),
    ]);

    actions.set_time(0.0);
    seq.on_enter().unwrap();
    for t in [0.0, 0.5, 1.0, 1.5] {
        actions.set_time(t);
        seq.run(0.5).unwrap();
    }

    let fired_at = fired_at.borrow();
    assert_eq!(fired_at.len(), 1);
    assert!(fired_at[0] >= 1.0);
    assert!(seq.is_complete());
}

#[test]
fn zero_wait_completes_on_the_tick_after_entry() {
    let actions = Rc::new(RecordingActions::new());
    let (count, bump) = counter();
    let mut seq = Sequence::new(vec![
        Box::new(Wait::new(0.0, ActionsHandle::with(actions.clone()))),
        Box::new(Execute::new(bump)),
    ]);

    seq.on_enter().unwrap();
    assert_eq!(seq.current(), 0, "wait must not finish inside on_enter");

    seq.run(0.0).unwrap();
    assert_eq!(seq.current(), 1);
    assert_eq!(count.get(), 0, "next child is entered but not run");

    seq.run(0.0).unwrap();
    assert_eq!(count.get(), 1);
    assert!(seq.is_complete());
}

#[test]
fn empty_sequence_is_complete_on_entry() {
    let mut seq = Sequence::new(Vec::new());
    seq.on_enter().unwrap();
    assert!(seq.is_complete());
    seq.run(0.0).unwrap();
    seq.on_exit();
}

#[test]
fn sequence_lifecycle_order() {
    let log = event_log();
    let mut seq = Sequence::new(vec![Probe::new("a", 2, &log), Probe::new("b", 1, &log)]);

    seq.on_enter().unwrap();
    seq.run(0.0).unwrap();
    seq.run(0.0).unwrap();
    seq.run(0.0).unwrap();
    assert!(seq.is_complete());
    seq.on_exit();

    assert_eq!(
        events(&log),
        ["a:enter", "a:run", "a:run", "a:exit", "b:enter", "b:run", "b:exit"]
    );
}

#[test]
fn sequence_exit_abandons_active_child() {
    let log = event_log();
    let mut seq = Sequence::new(vec![Probe::new("a", 5, &log), Probe::new("b", 1, &log)]);

    seq.on_enter().unwrap();
    seq.run(0.0).unwrap();
    seq.on_exit();

    assert_eq!(events(&log), ["a:enter", "a:run", "a:exit"]);
}

#[test]
fn sequence_reentry_resets_cursor_and_children() {
    let log = event_log();
    let mut seq = Sequence::new(vec![Probe::new("a", 1, &log), Probe::new("b", 3, &log)]);

    seq.on_enter().unwrap();
    seq.run(0.0).unwrap();
    seq.run(0.0).unwrap();
    assert_eq!(seq.current(), 1);
    seq.on_exit();

    log.borrow_mut().clear();
    seq.on_enter().unwrap();
    assert_eq!(seq.current(), 0);
    seq.run(0.0).unwrap();
    seq.run(0.0).unwrap();
    seq.run(0.0).unwrap();
    assert!(!seq.is_complete(), "b restarted its three-run count");
    assert_eq!(
        events(&log),
        ["a:enter", "a:run", "a:exit", "b:enter", "b:run", "b:run"]
    );
}

#[test]
fn repeat_forever_runs_callback_every_tick() {
    let (count, bump) = counter();
    let mut forever = Repeat::forever(vec![Box::new(Execute::new(bump))]);

    forever.on_enter().unwrap();
    for _ in 0..5 {
        forever.run(0.016).unwrap();
        assert!(!forever.is_complete());
    }
    assert_eq!(count.get(), 5);
}

#[test]
fn repeat_until_already_true_never_runs_body() {
    let log = event_log();
    let mut until = Repeat::until_true(|| true, vec![Probe::new("a", 1, &log)]);

    until.on_enter().unwrap();
    assert!(until.is_complete());
    until.run(0.0).unwrap();
    until.on_exit();

    assert!(events(&log).is_empty());
}

#[test]
fn repeat_until_completes_at_pass_boundary() {
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let body: Vec<BoxedBlock> = vec![
        Box::new(Execute::new({
            let a = Rc::clone(&a);
            move || a.set(a.get() + 1)
        })),
        Box::new(Execute::new({
            let b = Rc::clone(&b);
            move || b.set(b.get() + 1)
        })),
    ];
    let mut until = Repeat::until_true(
        {
            let b = Rc::clone(&b);
            move || b.get() >= 2
        },
        body,
    );

    until.on_enter().unwrap();
    for tick in 1..=3 {
        until.run(0.0).unwrap();
        assert!(!until.is_complete(), "completed early at tick {}", tick);
    }
    until.run(0.0).unwrap();
    assert!(until.is_complete());
    assert_eq!((a.get(), b.get()), (2, 2));

    until.run(0.0).unwrap();
    assert_eq!((a.get(), b.get()), (2, 2), "no work after exit");
}

#[test]
fn repeat_exit_before_step_leaves_child_entered() {
    let log = event_log();
    let (stop, read) = flag(false);
    let mut until = Repeat::until_true(read, vec![Probe::new("a", 3, &log)]);

    until.on_enter().unwrap();
    until.run(0.0).unwrap();
    stop.set(true);
    until.run(0.0).unwrap();
    assert!(until.is_complete());
    assert_eq!(events(&log), ["a:enter", "a:run"]);

    until.on_exit();
    assert_eq!(events(&log), ["a:enter", "a:run", "a:exit"]);
}

#[test]
fn repeat_stops_reevaluating_once_exiting() {
    let polls = Rc::new(Cell::new(0));
    let mut until = Repeat::until_true(
        {
            let polls = Rc::clone(&polls);
            move || {
                polls.set(polls.get() + 1);
                true
            }
        },
        vec![Box::new(Execute::new(|| {}))],
    );

    until.on_enter().unwrap();
    for _ in 0..4 {
        until.run(0.0).unwrap();
    }
    assert_eq!(polls.get(), 1);
}

/// Drive a loop whose predicate replays `script` and then keeps answering
/// `fallback`, returning per-tick completion and the number of body
/// executions.
fn drive(
    kind: fn(Box<dyn FnMut() -> bool>) -> LoopKind,
    script: &[bool],
    fallback: bool,
) -> (Vec<bool>, u32) {
    let (count, bump) = counter();
    let mut answers = script.to_vec().into_iter();
    let predicate: Box<dyn FnMut() -> bool> =
        Box::new(move || answers.next().unwrap_or(fallback));
    let mut repeat = Repeat::new(kind(predicate), vec![Box::new(Execute::new(bump))]);

    repeat.on_enter().unwrap();
    let mut completion = vec![repeat.is_complete()];
    for _ in 0..script.len() {
        repeat.run(0.0).unwrap();
        completion.push(repeat.is_complete());
    }
    (completion, count.get())
}

#[test]
fn repeat_while_is_until_with_negated_predicate() {
    let scripts: [&[bool]; 5] = [
        &[true, true, true, true, false, true],
        &[false],
        &[true, false, true, true],
        &[true, true, true, true, true, true, true, true],
        &[true, true, false, false, false],
    ];

    for script in scripts {
        let negated: Vec<bool> = script.iter().map(|v| !v).collect();
        let while_run = drive(LoopKind::WhileTrue, script, true);
        let until_run = drive(LoopKind::UntilTrue, &negated, false);
        assert_eq!(while_run, until_run, "script {:?}", script);
    }
}

#[test]
fn repeat_reentry_restarts_from_first_child() {
    let log = event_log();
    let mut forever = Repeat::forever(vec![Probe::new("a", 1, &log), Probe::new("b", 2, &log)]);

    forever.on_enter().unwrap();
    forever.run(0.0).unwrap();
    assert_eq!(forever.current(), 1);
    forever.on_exit();

    log.borrow_mut().clear();
    forever.on_enter().unwrap();
    assert_eq!(forever.current(), 0);
    assert_eq!(events(&log), ["a:enter"]);
}

#[test]
fn nested_sequence_is_reset_each_pass() {
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let inner = Sequence::new(vec![
        Box::new(Execute::new({
            let a = Rc::clone(&a);
            move || a.set(a.get() + 1)
        })),
        Box::new(Execute::new({
            let b = Rc::clone(&b);
            move || b.set(b.get() + 1)
        })),
    ]);
    let mut forever = Repeat::forever(vec![Box::new(inner)]);

    forever.on_enter().unwrap();
    for _ in 0..5 {
        forever.run(0.0).unwrap();
    }
    assert_eq!((a.get(), b.get()), (3, 2));
}

#[test]
fn empty_repeat_only_checks_on_entry() {
    let mut forever = Repeat::forever(Vec::new());
    forever.on_enter().unwrap();
    forever.run(0.0).unwrap();
    assert!(!forever.is_complete());

    let mut done = Repeat::until_true(|| true, Vec::new());
    done.on_enter().unwrap();
    assert!(done.is_complete());

    let (stop, read) = flag(false);
    let mut stuck = Repeat::until_true(read, Vec::new());
    stuck.on_enter().unwrap();
    stop.set(true);
    stuck.run(0.0).unwrap();
    assert!(!stuck.is_complete());
}

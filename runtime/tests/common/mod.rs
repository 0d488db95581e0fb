#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use runtime::{Block, BlockError};

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

/// A block that completes after a fixed number of runs and writes every
/// lifecycle call to a shared log as `name:event`.
pub struct Probe {
    name: &'static str,
    runs_needed: usize,
    runs: usize,
    log: EventLog,
}

impl Probe {
    pub fn new(name: &'static str, runs_needed: usize, log: &EventLog) -> Box<Self> {
        Box::new(Probe {
            name,
            runs_needed,
            runs: 0,
            log: Rc::clone(log),
        })
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, event));
    }
}

impl Block for Probe {
    fn on_create(&mut self) {
        self.record("create");
    }

    fn on_destroy(&mut self) {
        self.record("destroy");
    }

    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.runs = 0;
        self.record("enter");
        Ok(())
    }

    fn on_exit(&mut self) {
        self.record("exit");
    }

    fn run(&mut self, _delta_seconds: f64) -> Result<(), BlockError> {
        self.runs += 1;
        self.record("run");
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.runs >= self.runs_needed
    }

    fn kind(&self) -> &'static str {
        "probe"
    }
}

/// A shared call counter and a callback that bumps it.
pub fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0));
    let bump = {
        let count = Rc::clone(&count);
        move || count.set(count.get() + 1)
    };
    (count, bump)
}

/// A shared boolean and a predicate that reads it.
pub fn flag(initial: bool) -> (Rc<Cell<bool>>, impl FnMut() -> bool + 'static) {
    let flag = Rc::new(Cell::new(initial));
    let read = {
        let flag = Rc::clone(&flag);
        move || flag.get()
    };
    (flag, read)
}

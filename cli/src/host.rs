//! Headless stand-ins for the engine: a simulated clock, a console actions
//! provider and named objects that report their toggles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use runtime::{Actions, EngineObject};

/// Frame clock advanced by the simulation loop.
#[derive(Debug)]
pub struct SimClock {
    now: Cell<f64>,
    delta: Cell<f64>,
}

impl SimClock {
    pub fn new(start: f64) -> Self {
        SimClock {
            now: Cell::new(start),
            delta: Cell::new(0.0),
        }
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
        self.delta.set(seconds);
    }
}

/// Everything the scene did, one line per action.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: RefCell<Vec<String>>,
    echo: bool,
}

impl Transcript {
    /// With `echo` set, lines are also printed to stdout as they arrive.
    pub fn new(echo: bool) -> Self {
        Transcript {
            lines: RefCell::new(Vec::new()),
            echo,
        }
    }

    pub fn push(&self, line: String) {
        if self.echo {
            println!("{line}");
        }
        self.lines.borrow_mut().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

pub struct ConsoleActions {
    clock: Rc<SimClock>,
    transcript: Rc<Transcript>,
}

impl ConsoleActions {
    pub fn new(clock: Rc<SimClock>, transcript: Rc<Transcript>) -> Self {
        ConsoleActions { clock, transcript }
    }
}

impl Actions for ConsoleActions {
    fn log_message(&self, message: &str) {
        self.transcript.push(format!("[log] {message}"));
    }

    fn show_message(&self, message: &str, duration_seconds: f64) {
        if duration_seconds > 0.0 {
            self.transcript
                .push(format!("[say] {message} ({duration_seconds}s)"));
        } else {
            self.transcript.push(format!("[say] {message}"));
        }
    }

    fn play_sound(&self, name: &str, volume: f64) {
        if volume == 1.0 {
            self.transcript.push(format!("[sound] {name}"));
        } else {
            self.transcript.push(format!("[sound] {name} @ {volume}"));
        }
    }

    fn current_time_seconds(&self) -> f64 {
        self.clock.now()
    }

    fn delta_time_seconds(&self) -> f64 {
        self.clock.delta.get()
    }
}

/// A scene object that writes its toggles to the transcript.
pub struct ConsoleObject {
    name: String,
    enabled: Cell<bool>,
    transcript: Rc<Transcript>,
}

impl ConsoleObject {
    pub fn new(name: impl Into<String>, enabled: bool, transcript: Rc<Transcript>) -> Self {
        ConsoleObject {
            name: name.into(),
            enabled: Cell::new(enabled),
            transcript,
        }
    }
}

impl EngineObject for ConsoleObject {
    fn set_enabled(&self, enabled: bool) {
        let was = self.enabled.replace(enabled);
        debug!(object = %self.name, was, enabled, "object toggled");
        let verb = if enabled { "enable" } else { "disable" };
        self.transcript.push(format!("[{verb}] {}", self.name));
    }
}

//! Recording test doubles for [`Actions`] and [`EngineObject`].

use std::cell::{Cell, RefCell};

use crate::actions::{Actions, EngineObject};

/// One call made against [`RecordingActions`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord {
    Log(String),
    Show { message: String, duration: f64 },
    Sound { name: String, volume: f64 },
}

/// An actions provider with a hand-driven clock that records every call.
#[derive(Debug, Default)]
pub struct RecordingActions {
    now: Cell<f64>,
    delta: Cell<f64>,
    records: RefCell<Vec<ActionRecord>>,
}

impl RecordingActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, seconds: f64) {
        self.now.set(seconds);
    }

    /// Move the clock forward and remember the step as the frame delta.
    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
        self.delta.set(seconds);
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        self.records.borrow().clone()
    }

    /// Messages passed to `show_message`, in call order.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|r| match r {
                ActionRecord::Show { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Actions for RecordingActions {
    fn log_message(&self, message: &str) {
        self.records
            .borrow_mut()
            .push(ActionRecord::Log(message.to_string()));
    }

    fn show_message(&self, message: &str, duration_seconds: f64) {
        self.records.borrow_mut().push(ActionRecord::Show {
            message: message.to_string(),
            duration: duration_seconds,
        });
    }

    fn play_sound(&self, name: &str, volume: f64) {
        self.records.borrow_mut().push(ActionRecord::Sound {
            name: name.to_string(),
            volume,
        });
    }

    fn current_time_seconds(&self) -> f64 {
        self.now.get()
    }

    fn delta_time_seconds(&self) -> f64 {
        self.delta.get()
    }
}

/// An engine object that remembers every enable/disable call.
#[derive(Debug, Default)]
pub struct RecordingObject {
    enabled: Cell<bool>,
    history: RefCell<Vec<bool>>,
}

impl RecordingObject {
    pub fn new(enabled: bool) -> Self {
        RecordingObject {
            enabled: Cell::new(enabled),
            history: RefCell::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }
}

impl EngineObject for RecordingObject {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        self.history.borrow_mut().push(enabled);
    }
}

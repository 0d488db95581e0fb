use crate::actions::ActionsHandle;
use crate::block::Block;
use crate::error::BlockError;

/// Completes once the host clock has moved `duration` seconds past entry.
///
/// Progress is anchored to the start timestamp rather than summed deltas, so
/// uneven tick rates do not drift. The clock is sampled on entry and on every
/// run, which keeps `is_complete` a pure read: completion reflects the time
/// seen by the last `run` (or entry), not the live clock.
#[derive(Debug)]
pub struct Wait {
    duration: f64,
    start: f64,
    now: f64,
    clock: ActionsHandle,
}

impl Wait {
    pub fn new(duration: f64, clock: ActionsHandle) -> Self {
        Wait {
            duration,
            start: 0.0,
            now: 0.0,
            clock,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Seconds left as of the last sample, never negative.
    pub fn remaining(&self) -> f64 {
        (self.start + self.duration - self.now).max(0.0)
    }
}

impl Block for Wait {
    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.start = self.clock.current_time()?;
        self.now = self.start;
        Ok(())
    }

    fn run(&mut self, _delta_seconds: f64) -> Result<(), BlockError> {
        self.now = self.clock.current_time()?;
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.now >= self.start + self.duration
    }

    fn kind(&self) -> &'static str {
        "wait"
    }
}

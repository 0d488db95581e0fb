use std::fmt;

use crate::block::{Block, Predicate};
use crate::error::BlockError;

/// A gate that polls its predicate once per run and completes on the first
/// run that sees it true.
pub struct Condition {
    predicate: Predicate,
    result: bool,
}

impl Condition {
    pub fn new(predicate: impl FnMut() -> bool + 'static) -> Self {
        Condition {
            predicate: Box::new(predicate),
            result: false,
        }
    }
}

impl Block for Condition {
    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.result = false;
        Ok(())
    }

    fn run(&mut self, _delta_seconds: f64) -> Result<(), BlockError> {
        self.result = (self.predicate)();
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.result
    }

    fn kind(&self) -> &'static str {
        "condition"
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

use std::fmt;

use crate::block::Block;
use crate::error::BlockError;

type Callback = Box<dyn FnMut() -> Result<(), BlockError>>;

/// Fires a callback once per activation, on the first run after entry.
///
/// Firing on `run` rather than `on_enter` limits a sequence of executes to
/// one callback per tick.
pub struct Execute {
    callback: Callback,
    executed: bool,
}

impl Execute {
    pub fn new(mut callback: impl FnMut() + 'static) -> Self {
        Self::try_new(move || {
            callback();
            Ok(())
        })
    }

    /// Build from a fallible callback. An error is returned from `run` as is;
    /// the callback still counts as fired and will not run again this
    /// activation.
    pub fn try_new(callback: impl FnMut() -> Result<(), BlockError> + 'static) -> Self {
        Execute {
            callback: Box::new(callback),
            executed: false,
        }
    }
}

impl Block for Execute {
    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.executed = false;
        Ok(())
    }

    fn run(&mut self, _delta_seconds: f64) -> Result<(), BlockError> {
        if self.executed {
            return Ok(());
        }
        self.executed = true;
        (self.callback)()
    }

    fn is_complete(&self) -> bool {
        self.executed
    }

    fn kind(&self) -> &'static str {
        "execute"
    }
}

impl fmt::Debug for Execute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execute")
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}

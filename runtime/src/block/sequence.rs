use crate::block::{Block, BoxedBlock};
use crate::error::BlockError;

/// Runs its children one after another.
///
/// When a child completes it is exited and the next child is entered within
/// the same tick, but the new child is not run until the next tick. An empty
/// sequence is complete as soon as it is entered.
///
/// If entering the next child fails, that child is entered again on the
/// following tick and only run the tick after.
pub struct Sequence {
    blocks: Vec<BoxedBlock>,
    current: usize,
    child_entered: bool,
}

impl Sequence {
    pub fn new(blocks: Vec<BoxedBlock>) -> Self {
        Sequence {
            blocks,
            current: 0,
            child_entered: false,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the active child; equals `len()` once finished.
    pub fn current(&self) -> usize {
        self.current
    }

    fn enter_current(&mut self) -> Result<(), BlockError> {
        if let Some(block) = self.blocks.get_mut(self.current) {
            block.on_enter()?;
            self.child_entered = true;
        }
        Ok(())
    }
}

impl Block for Sequence {
    fn on_create(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.on_create());
    }

    fn on_destroy(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.on_destroy());
    }

    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.current = 0;
        self.child_entered = false;
        self.enter_current()
    }

    fn on_exit(&mut self) {
        if !self.child_entered {
            return;
        }
        if let Some(block) = self.blocks.get_mut(self.current) {
            block.on_exit();
        }
        self.child_entered = false;
    }

    fn run(&mut self, delta_seconds: f64) -> Result<(), BlockError> {
        if self.current >= self.blocks.len() {
            return Ok(());
        }
        if !self.child_entered {
            return self.enter_current();
        }

        let block = &mut self.blocks[self.current];
        block.run(delta_seconds)?;
        if !block.is_complete() {
            return Ok(());
        }

        block.on_exit();
        self.child_entered = false;
        self.current += 1;
        self.enter_current()
    }

    fn is_complete(&self) -> bool {
        self.current >= self.blocks.len()
    }

    fn kind(&self) -> &'static str {
        "sequence"
    }
}

use std::fmt;

use crate::block::{Block, BoxedBlock};
use crate::error::BlockError;

pub type Predicate = Box<dyn FnMut() -> bool>;

/// Decides when a [`Repeat`] stops looping.
pub enum LoopKind {
    /// Never exits.
    Forever,
    /// Exits once the predicate reads false.
    WhileTrue(Predicate),
    /// Exits once the predicate reads true.
    UntilTrue(Predicate),
}

impl LoopKind {
    fn should_exit(&mut self) -> bool {
        match self {
            LoopKind::Forever => false,
            LoopKind::WhileTrue(predicate) => !predicate(),
            LoopKind::UntilTrue(predicate) => predicate(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LoopKind::Forever => "repeat_forever",
            LoopKind::WhileTrue(_) => "repeat_while_true",
            LoopKind::UntilTrue(_) => "repeat_until_true",
        }
    }
}

impl fmt::Debug for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loops over its body until the loop kind says to stop.
///
/// The exit check runs on entry, before every child step, and when the
/// cursor wraps back to the first child. It never interrupts a child
/// mid-step. When the check fires before a step the active child is left
/// entered; it is exited when the repeat itself is exited.
///
/// An empty body is never stepped, so only the entry check can complete it.
/// A child whose entry failed is entered again on the next step instead of
/// being run.
pub struct Repeat {
    kind: LoopKind,
    blocks: Vec<BoxedBlock>,
    current: usize,
    should_exit: bool,
    child_entered: bool,
}

impl Repeat {
    pub fn new(kind: LoopKind, blocks: Vec<BoxedBlock>) -> Self {
        Repeat {
            kind,
            blocks,
            current: 0,
            should_exit: false,
            child_entered: false,
        }
    }

    pub fn forever(blocks: Vec<BoxedBlock>) -> Self {
        Self::new(LoopKind::Forever, blocks)
    }

    pub fn while_true(predicate: impl FnMut() -> bool + 'static, blocks: Vec<BoxedBlock>) -> Self {
        Self::new(LoopKind::WhileTrue(Box::new(predicate)), blocks)
    }

    pub fn until_true(predicate: impl FnMut() -> bool + 'static, blocks: Vec<BoxedBlock>) -> Self {
        Self::new(LoopKind::UntilTrue(Box::new(predicate)), blocks)
    }

    pub fn loop_kind(&self) -> &LoopKind {
        &self.kind
    }

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

impl Block for Repeat {
    fn on_create(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.on_create());
    }

    fn on_destroy(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.on_destroy());
    }

    fn on_enter(&mut self) -> Result<(), BlockError> {
        self.current = 0;
        self.should_exit = false;
        self.child_entered = false;

        if self.kind.should_exit() {
            self.should_exit = true;
            return Ok(());
        }
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
        if self.should_exit || self.blocks.is_empty() {
            return Ok(());
        }

        if self.kind.should_exit() {
            self.should_exit = true;
            return Ok(());
        }

        if !self.child_entered {
            // Entering this child failed on an earlier tick.
            return self.enter_current();
        }

        let Some(block) = self.blocks.get_mut(self.current) else {
            return Ok(());
        };
        block.run(delta_seconds)?;
        if !block.is_complete() {
            return Ok(());
        }

        block.on_exit();
        self.child_entered = false;
        self.current += 1;

        if self.current >= self.blocks.len() {
            // A full pass finished; check before starting another.
            if self.kind.should_exit() {
                self.should_exit = true;
                return Ok(());
            }
            self.current = 0;
        }

        self.enter_current()
    }

    fn is_complete(&self) -> bool {
        self.should_exit
    }

    fn kind(&self) -> &'static str {
        self.kind.name()
    }
}

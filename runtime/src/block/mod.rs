//! The block contract and the built-in block kinds.
//!
//! A block is a small state machine advanced once per tick by its owner.
//! For any single activation the owner calls [`Block::on_enter`], then
//! [`Block::run`] zero or more times, checking [`Block::is_complete`] after
//! each run, and finally [`Block::on_exit`]. Re-entering a block starts a
//! fresh activation and must reset all of its progress.

mod condition;
mod execute;
mod repeat;
mod sequence;
mod wait;

pub use condition::Condition;
pub use execute::Execute;
pub use repeat::{LoopKind, Predicate, Repeat};
pub use sequence::Sequence;
pub use wait::Wait;

use crate::error::BlockError;

pub trait Block {
    /// Called once before the first activation.
    fn on_create(&mut self) {}

    /// Called once after the final deactivation.
    fn on_destroy(&mut self) {}

    /// Start a new activation, discarding any earlier progress.
    fn on_enter(&mut self) -> Result<(), BlockError>;

    /// End the current activation, whether the block finished or its owner
    /// abandoned it.
    fn on_exit(&mut self) {}

    /// Advance by one tick. Must not assume a fixed tick rate.
    fn run(&mut self, delta_seconds: f64) -> Result<(), BlockError>;

    /// Whether this activation has finished. Pure; stable between runs.
    fn is_complete(&self) -> bool;

    /// Short name used in log output.
    fn kind(&self) -> &'static str {
        "block"
    }
}

pub type BoxedBlock = Box<dyn Block>;

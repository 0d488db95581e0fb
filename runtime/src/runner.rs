use std::fmt;

use tracing::{debug, trace, warn};

use crate::block::BoxedBlock;
use crate::error::BlockError;

/// Identifies a root block registered with a [`BlockRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the active root blocks and advances each of them once per tick.
///
/// A block in the runner has been entered and not yet exited. Roots that
/// complete during a tick are exited and dropped before that tick returns.
#[derive(Default)]
pub struct BlockRunner {
    blocks: Vec<(BlockId, BoxedBlock)>,
    next_id: u64,
}

impl BlockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `block` and start ticking it from the next `process` call.
    /// If entering fails the block is dropped without being registered.
    pub fn add_block(&mut self, mut block: BoxedBlock) -> Result<BlockId, BlockError> {
        block.on_create();
        block.on_enter()?;

        let id = BlockId(self.next_id);
        self.next_id += 1;
        debug!(%id, kind = block.kind(), "root block added");
        self.blocks.push((id, block));
        Ok(id)
    }

    /// Advance every root block once.
    ///
    /// Roots are visited newest first. An error from a root stops the tick
    /// immediately: roots not yet visited are skipped this tick and the
    /// failing root stays registered.
    pub fn process(&mut self, delta_seconds: f64) -> Result<(), BlockError> {
        trace!(delta_seconds, active = self.blocks.len(), "processing tick");

        for index in (0..self.blocks.len()).rev() {
            let Some((id, block)) = self.blocks.get_mut(index) else {
                continue;
            };

            block.run(delta_seconds)?;
            if !block.is_complete() {
                continue;
            }

            block.on_exit();
            block.on_destroy();
            let id = *id;
            self.blocks.remove(index);
            debug!(%id, "root block completed");
        }
        Ok(())
    }

    /// Remove a root block before it completes, exiting it exactly once.
    /// Returns false if `id` is not active.
    pub fn cancel(&mut self, id: BlockId) -> bool {
        let Some(index) = self.blocks.iter().position(|(candidate, _)| *candidate == id) else {
            return false;
        };

        let (_, mut block) = self.blocks.remove(index);
        block.on_exit();
        block.on_destroy();
        debug!(%id, "root block cancelled");
        true
    }

    /// Drop every root block without exiting it. Intended for host shutdown.
    pub fn dispose(&mut self) {
        if !self.blocks.is_empty() {
            warn!(active = self.blocks.len(), "disposing runner with active blocks");
        }
        self.blocks.clear();
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|(candidate, _)| *candidate == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Debug for BlockRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRunner")
            .field(
                "blocks",
                &self
                    .blocks
                    .iter()
                    .map(|(id, block)| (id.0, block.kind()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

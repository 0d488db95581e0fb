use std::rc::Rc;

use crate::actions::{Actions, ActionsHandle};
use crate::block::{BoxedBlock, Sequence};
use crate::builder::Blocks;
use crate::error::BlockError;
use crate::runner::{BlockId, BlockRunner};

/// One independent block runtime: an actions provider plus a runner.
///
/// A host creates a context, installs its actions, builds blocks through
/// [`Context::blocks`], registers them with [`Context::run`], calls
/// [`Context::process`] once per frame and finally [`Context::dispose`]s it.
/// Contexts share nothing, so several can live side by side.
#[derive(Debug, Default)]
pub struct Context {
    actions: ActionsHandle,
    runner: BlockRunner,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: Rc<dyn Actions>) -> Self {
        Context {
            actions: ActionsHandle::with(actions),
            runner: BlockRunner::new(),
        }
    }

    pub fn install_actions(&self, actions: Rc<dyn Actions>) {
        self.actions.install(actions);
    }

    pub fn actions(&self) -> ActionsHandle {
        self.actions.clone()
    }

    /// A builder whose blocks use this context's actions.
    pub fn blocks(&self) -> Blocks {
        Blocks::new(self.actions.clone())
    }

    /// Run `blocks` one after another as a new root.
    pub fn run(&mut self, blocks: Vec<BoxedBlock>) -> Result<BlockId, BlockError> {
        self.run_block(Box::new(Sequence::new(blocks)))
    }

    pub fn run_block(&mut self, block: BoxedBlock) -> Result<BlockId, BlockError> {
        self.runner.add_block(block)
    }

    pub fn process(&mut self, delta_seconds: f64) -> Result<(), BlockError> {
        self.runner.process(delta_seconds)
    }

    pub fn cancel(&mut self, id: BlockId) -> bool {
        self.runner.cancel(id)
    }

    pub fn is_running(&self, id: BlockId) -> bool {
        self.runner.contains(id)
    }

    pub fn active_blocks(&self) -> usize {
        self.runner.len()
    }

    pub fn is_idle(&self) -> bool {
        self.runner.is_empty()
    }

    /// Drop all root blocks without exiting them and uninstall the actions
    /// provider. Blocks built earlier from this context fail with
    /// [`BlockError::ActionsNotInitialized`] if they touch actions afterwards.
    pub fn dispose(&mut self) {
        self.runner.dispose();
        self.actions.clear();
    }
}

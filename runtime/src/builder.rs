use std::rc::Rc;

use crate::actions::{ActionsHandle, EngineObject};
use crate::block::{BoxedBlock, Condition, Execute, Repeat, Sequence, Wait};
use crate::error::BlockError;

/// Terse constructors for block graphs.
///
/// ```ignore
/// let b = ctx.blocks();
/// ctx.run(vec![
///     b.wait(1.0),
///     b.repeat_forever(vec![b.enable(light.clone()), b.wait(0.1), b.disable(light)]),
/// ])?;
/// ```
#[derive(Debug, Clone)]
pub struct Blocks {
    actions: ActionsHandle,
}

impl Blocks {
    pub fn new(actions: ActionsHandle) -> Self {
        Blocks { actions }
    }

    pub fn wait(&self, seconds: f64) -> BoxedBlock {
        Box::new(Wait::new(seconds, self.actions.clone()))
    }

    pub fn execute(&self, callback: impl FnMut() + 'static) -> BoxedBlock {
        Box::new(Execute::new(callback))
    }

    pub fn try_execute(
        &self,
        callback: impl FnMut() -> Result<(), BlockError> + 'static,
    ) -> BoxedBlock {
        Box::new(Execute::try_new(callback))
    }

    pub fn condition(&self, predicate: impl FnMut() -> bool + 'static) -> BoxedBlock {
        Box::new(Condition::new(predicate))
    }

    /// Hold until `predicate` reads true on a tick.
    pub fn wait_until(&self, predicate: impl FnMut() -> bool + 'static) -> BoxedBlock {
        self.condition(predicate)
    }

    pub fn sequence(&self, blocks: Vec<BoxedBlock>) -> BoxedBlock {
        Box::new(Sequence::new(blocks))
    }

    pub fn repeat_forever(&self, blocks: Vec<BoxedBlock>) -> BoxedBlock {
        Box::new(Repeat::forever(blocks))
    }

    /// Call `callback` once per tick, forever.
    pub fn repeat_forever_with(&self, callback: impl FnMut() + 'static) -> BoxedBlock {
        self.repeat_forever(vec![self.execute(callback)])
    }

    pub fn repeat_while_true(
        &self,
        predicate: impl FnMut() -> bool + 'static,
        blocks: Vec<BoxedBlock>,
    ) -> BoxedBlock {
        Box::new(Repeat::while_true(predicate, blocks))
    }

    pub fn repeat_until_true(
        &self,
        predicate: impl FnMut() -> bool + 'static,
        blocks: Vec<BoxedBlock>,
    ) -> BoxedBlock {
        Box::new(Repeat::until_true(predicate, blocks))
    }

    pub fn say(&self, message: impl Into<String>) -> BoxedBlock {
        self.say_for(message, 0.0)
    }

    pub fn say_for(&self, message: impl Into<String>, duration_seconds: f64) -> BoxedBlock {
        let actions = self.actions.clone();
        let message = message.into();
        self.try_execute(move || {
            actions.get()?.show_message(&message, duration_seconds);
            Ok(())
        })
    }

    pub fn play_sound(&self, name: impl Into<String>) -> BoxedBlock {
        self.play_sound_at(name, 1.0)
    }

    pub fn play_sound_at(&self, name: impl Into<String>, volume: f64) -> BoxedBlock {
        let actions = self.actions.clone();
        let name = name.into();
        self.try_execute(move || {
            actions.get()?.play_sound(&name, volume);
            Ok(())
        })
    }

    pub fn log(&self, message: impl Into<String>) -> BoxedBlock {
        let actions = self.actions.clone();
        let message = message.into();
        self.try_execute(move || {
            actions.get()?.log_message(&message);
            Ok(())
        })
    }

    pub fn enable(&self, object: Rc<dyn EngineObject>) -> BoxedBlock {
        self.execute(move || object.set_enabled(true))
    }

    pub fn disable(&self, object: Rc<dyn EngineObject>) -> BoxedBlock {
        self.execute(move || object.set_enabled(false))
    }
}

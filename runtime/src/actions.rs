use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::BlockError;

/// Host capabilities reached by leaf blocks.
///
/// Implementations are supplied by the embedding engine. Every call is
/// assumed synchronous and non-blocking.
pub trait Actions {
    fn log_message(&self, message: &str);
    fn show_message(&self, message: &str, duration_seconds: f64);
    fn play_sound(&self, name: &str, volume: f64);
    /// Monotonic simulation time, read by `Wait`.
    fn current_time_seconds(&self) -> f64;
    fn delta_time_seconds(&self) -> f64;
}

/// A host object that can be switched on and off by `enable`/`disable` blocks.
pub trait EngineObject {
    fn set_enabled(&self, enabled: bool);
}

/// Shared slot holding the active actions provider.
///
/// Every block built from one context holds a clone of the same handle, so
/// installing or clearing the provider is visible to all of them. Reading an
/// empty slot is a wiring bug and reports [`BlockError::ActionsNotInitialized`].
#[derive(Clone, Default)]
pub struct ActionsHandle {
    slot: Rc<RefCell<Option<Rc<dyn Actions>>>>,
}

impl ActionsHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(actions: Rc<dyn Actions>) -> Self {
        let handle = Self::new();
        handle.install(actions);
        handle
    }

    pub fn install(&self, actions: Rc<dyn Actions>) {
        *self.slot.borrow_mut() = Some(actions);
    }

    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_installed(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// The installed provider. The slot borrow is released before returning,
    /// so providers may be swapped from inside a callback.
    pub fn get(&self) -> Result<Rc<dyn Actions>, BlockError> {
        self.slot
            .borrow()
            .clone()
            .ok_or(BlockError::ActionsNotInitialized)
    }

    pub fn current_time(&self) -> Result<f64, BlockError> {
        Ok(self.get()?.current_time_seconds())
    }
}

impl fmt::Debug for ActionsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionsHandle")
            .field("installed", &self.is_installed())
            .finish()
    }
}

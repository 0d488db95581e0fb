pub mod actions;
pub mod block;
pub mod builder;
pub mod context;
pub mod error;
pub mod runner;
pub mod table;
#[cfg(feature = "testing")]
pub mod testing;
pub mod value;

pub use actions::{Actions, ActionsHandle, EngineObject};
pub use block::{
    Block, BoxedBlock, Condition, Execute, LoopKind, Predicate, Repeat, Sequence, Wait,
};
pub use builder::Blocks;
pub use context::Context;
pub use error::{BlockError, TableError};
pub use runner::{BlockId, BlockRunner};
pub use table::Table;
pub use value::Variable;

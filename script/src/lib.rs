pub mod compile;
pub mod error;
pub mod scene;
pub mod world;

pub use compile::{CompiledScript, compile_scene};
pub use error::ScriptError;
pub use scene::{BlockSpec, CompareOp, ConditionSpec, ObjectSpec, Scene, ScriptSpec, ScriptValue};
pub use world::{SceneObject, World};

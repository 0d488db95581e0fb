use std::rc::Rc;

use tracing::debug;

use runtime::{Blocks, BoxedBlock, EngineObject, Predicate, Variable};

use crate::error::ScriptError;
use crate::scene::{BlockSpec, ConditionSpec, Scene};
use crate::world::World;

/// A script turned into a runnable root block.
pub struct CompiledScript {
    pub name: String,
    pub block: BoxedBlock,
}

/// Compile every script of `scene` into a root sequence, resolving object
/// and variable names against `world`.
pub fn compile_scene(
    scene: &Scene,
    blocks: &Blocks,
    world: &World,
) -> Result<Vec<CompiledScript>, ScriptError> {
    scene
        .scripts
        .iter()
        .map(|script| {
            let compiler = Compiler {
                blocks,
                world,
                script: &script.name,
            };
            let body = compiler.compile_all(&script.blocks)?;
            debug!(script = %script.name, blocks = body.len(), "compiled script");
            Ok(CompiledScript {
                name: script.name.clone(),
                block: blocks.sequence(body),
            })
        })
        .collect()
}

struct Compiler<'a> {
    blocks: &'a Blocks,
    world: &'a World,
    script: &'a str,
}

impl Compiler<'_> {
    fn compile_all(&self, specs: &[BlockSpec]) -> Result<Vec<BoxedBlock>, ScriptError> {
        specs.iter().map(|spec| self.compile(spec)).collect()
    }

    fn compile(&self, spec: &BlockSpec) -> Result<BoxedBlock, ScriptError> {
        let b = self.blocks;
        let block = match spec {
            BlockSpec::Wait(seconds) => b.wait(*seconds),
            BlockSpec::Say { message, duration } => b.say_for(message.clone(), *duration),
            BlockSpec::PlaySound { name, volume } => b.play_sound_at(name.clone(), *volume),
            BlockSpec::Log(message) => b.log(message.clone()),
            BlockSpec::Enable(name) => b.enable(self.object(name)?),
            BlockSpec::Disable(name) => b.disable(self.object(name)?),
            BlockSpec::Set { var, value } => {
                self.require_variable(var)?;
                let table = self.world.variables();
                let var = var.clone();
                let value = Variable::from(value);
                b.execute(move || table.borrow_mut().set_key(var.clone(), value.clone()))
            }
            BlockSpec::Change { var, by } => {
                self.require_variable(var)?;
                let table = self.world.variables();
                let var = var.clone();
                let by = *by;
                b.execute(move || {
                    let mut table = table.borrow_mut();
                    let next = table.get_key(&var).as_number() + by;
                    table.set_key(var.clone(), next);
                })
            }
            BlockSpec::WaitUntil(condition) => b.wait_until(self.predicate(condition)?),
            BlockSpec::Sequence(children) => b.sequence(self.compile_all(children)?),
            BlockSpec::RepeatForever(children) => b.repeat_forever(self.compile_all(children)?),
            BlockSpec::RepeatWhile { condition, blocks } => {
                b.repeat_while_true(self.predicate(condition)?, self.compile_all(blocks)?)
            }
            BlockSpec::RepeatUntil { condition, blocks } => {
                b.repeat_until_true(self.predicate(condition)?, self.compile_all(blocks)?)
            }
        };
        Ok(block)
    }

    fn object(&self, name: &str) -> Result<Rc<dyn EngineObject>, ScriptError> {
        self.world
            .object(name)
            .ok_or_else(|| ScriptError::UnknownObject {
                name: name.to_string(),
                script: self.script.to_string(),
            })
    }

    fn require_variable(&self, name: &str) -> Result<(), ScriptError> {
        if self.world.has_variable(name) {
            Ok(())
        } else {
            Err(ScriptError::UnknownVariable {
                name: name.to_string(),
                script: self.script.to_string(),
            })
        }
    }

    fn predicate(&self, condition: &ConditionSpec) -> Result<Predicate, ScriptError> {
        self.require_variable(&condition.var)?;
        let table = self.world.variables();
        let var = condition.var.clone();
        let op = condition.op;
        let expected = Variable::from(&condition.value);
        Ok(Box::new(move || {
            op.compare(&table.borrow().get_key(&var), &expected)
        }))
    }
}

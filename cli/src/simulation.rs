use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use runtime::{BlockError, BlockId, Context, EngineObject};
use script::{Scene, ScriptError, World, compile_scene};

use crate::host::{ConsoleActions, ConsoleObject, SimClock, Transcript};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("runtime error: {0}")]
    Runtime(#[from] BlockError),
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub ticks: u32,
    pub active: usize,
    pub elapsed: f64,
}

/// A scene loaded into a fresh context, driven by a simulated clock.
pub struct Simulation {
    ctx: Context,
    clock: Rc<SimClock>,
    transcript: Rc<Transcript>,
    world: World,
    scripts: Vec<(String, BlockId)>,
    start: f64,
}

impl Simulation {
    /// Compile every script of `scene` and register it as a root block.
    pub fn new(scene: &Scene, start: f64, echo: bool) -> Result<Self, SimulationError> {
        let clock = Rc::new(SimClock::new(start));
        let transcript = Rc::new(Transcript::new(echo));
        let actions = Rc::new(ConsoleActions::new(clock.clone(), transcript.clone()));
        let mut ctx = Context::with_actions(actions);

        let world = World::from_scene(scene, |spec| {
            Rc::new(ConsoleObject::new(&spec.name, spec.enabled, transcript.clone()))
                as Rc<dyn EngineObject>
        })?;

        let mut scripts = Vec::new();
        for script in compile_scene(scene, &ctx.blocks(), &world)? {
            let id = ctx.run_block(script.block)?;
            debug!(script = %script.name, %id, "script started");
            scripts.push((script.name, id));
        }

        Ok(Simulation {
            ctx,
            clock,
            transcript,
            world,
            scripts,
            start,
        })
    }

    /// Tick up to `ticks` frames at `fps`, stopping early once every script
    /// has finished.
    pub fn run(&mut self, ticks: u32, fps: f64) -> Result<Summary, BlockError> {
        let delta = 1.0 / fps;
        let mut ran = 0;
        while ran < ticks && !self.ctx.is_idle() {
            self.clock.advance(delta);
            self.ctx.process(delta)?;
            ran += 1;
        }

        let summary = Summary {
            ticks: ran,
            active: self.ctx.active_blocks(),
            elapsed: self.clock.now() - self.start,
        };
        info!(
            ticks = summary.ticks,
            active = summary.active,
            elapsed = summary.elapsed,
            "simulation stopped"
        );
        Ok(summary)
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript.lines()
    }

    /// Names of scripts that have not finished yet.
    pub fn running_scripts(&self) -> Vec<&str> {
        self.scripts
            .iter()
            .filter(|(_, id)| self.ctx.is_running(*id))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Final variable values, sorted by name.
    pub fn variables(&self) -> Vec<(String, String)> {
        let table = self.world.variables();
        let table = table.borrow();
        let mut vars: Vec<(String, String)> = table
            .keys()
            .map(|key| (key.to_string(), table.get_key(key).as_string()))
            .collect();
        vars.sort();
        vars
    }

    /// Cancel whatever is still running so every block sees its exit, then
    /// release the context.
    pub fn shutdown(mut self) {
        for (name, id) in &self.scripts {
            if self.ctx.cancel(*id) {
                debug!(script = %name, "script cancelled at shutdown");
            }
        }
        self.ctx.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(source: &str) -> Simulation {
        let scene = Scene::parse(source, 0).unwrap();
        Simulation::new(&scene, 0.0, false).unwrap()
    }

    #[test]
    fn stops_early_when_scripts_finish() {
        let mut sim = simulation(
            r#"
            [[scripts]]
            name = "hello"
            blocks = [{ say = { message = "hello" } }, { wait = 0.1 }, { log = "bye" }]
            "#,
        );

        let summary = sim.run(100, 10.0).unwrap();

        assert_eq!(sim.transcript(), ["[say] hello", "[log] bye"]);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.active, 0);
        assert!(sim.running_scripts().is_empty());
    }

    #[test]
    fn forever_loops_run_out_the_tick_budget() {
        let mut sim = simulation(
            r#"
            [[objects]]
            name = "light"

            [variables]
            blinks = 0

            [[scripts]]
            name = "blink"
            blocks = [{ repeat_forever = [
                { enable = "light" },
                { disable = "light" },
                { change = { var = "blinks", by = 1 } },
            ] }]
            "#,
        );

        let summary = sim.run(6, 30.0).unwrap();

        assert_eq!(summary.ticks, 6);
        assert_eq!(summary.active, 1);
        assert_eq!(sim.running_scripts(), ["blink"]);
        assert_eq!(sim.variables(), [("blinks".to_string(), "2".to_string())]);
        assert_eq!(
            sim.transcript(),
            [
                "[enable] light",
                "[disable] light",
                "[enable] light",
                "[disable] light",
            ]
        );
        sim.shutdown();
    }

    #[test]
    fn compile_errors_surface_before_running() {
        let scene = Scene::parse(
            r#"
            [[scripts]]
            name = "lights"
            blocks = [{ enable = "lamp" }]
            "#,
            0,
        )
        .unwrap();

        let err = Simulation::new(&scene, 0.0, false).err().unwrap();
        assert!(matches!(
            err,
            SimulationError::Script(ScriptError::UnknownObject { .. })
        ));
    }
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use runtime::{EngineObject, Table, Variable};

use crate::error::ScriptError;
use crate::scene::{ObjectSpec, Scene};

/// Host state that compiled scripts read and write: the variable table and
/// the named engine objects.
pub struct World {
    variables: Rc<RefCell<Table>>,
    objects: HashMap<String, Rc<dyn EngineObject>>,
}

impl World {
    pub fn new(variables: Table) -> Self {
        World {
            variables: Rc::new(RefCell::new(variables)),
            objects: HashMap::new(),
        }
    }

    /// Build a world from a scene's declarations, asking `make_object` for
    /// the host object behind each `[[objects]]` entry.
    pub fn from_scene(
        scene: &Scene,
        mut make_object: impl FnMut(&ObjectSpec) -> Rc<dyn EngineObject>,
    ) -> Result<Self, ScriptError> {
        let mut world = World::new(scene.initial_variables());
        for spec in &scene.objects {
            world.insert_object(spec.name.clone(), make_object(spec))?;
        }
        Ok(world)
    }

    pub fn insert_object(
        &mut self,
        name: impl Into<String>,
        object: Rc<dyn EngineObject>,
    ) -> Result<(), ScriptError> {
        let name = name.into();
        if self.objects.contains_key(&name) {
            return Err(ScriptError::DuplicateObject(name));
        }
        self.objects.insert(name, object);
        Ok(())
    }

    pub fn object(&self, name: &str) -> Option<Rc<dyn EngineObject>> {
        self.objects.get(name).cloned()
    }

    pub fn variables(&self) -> Rc<RefCell<Table>> {
        Rc::clone(&self.variables)
    }

    pub fn variable(&self, name: &str) -> Variable {
        self.variables.borrow().get_key(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.borrow().has_key(name)
    }
}

/// A plain engine object that only tracks its enabled flag.
#[derive(Debug)]
pub struct SceneObject {
    name: String,
    enabled: Cell<bool>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        SceneObject {
            name: name.into(),
            enabled: Cell::new(enabled),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl EngineObject for SceneObject {
    fn set_enabled(&self, enabled: bool) {
        debug!(object = %self.name, enabled, "object toggled");
        self.enabled.set(enabled);
    }
}

//! The scene file format.
//!
//! A scene is a TOML document declaring variables, named host objects and
//! scripts. Each script is a list of block entries, written as single-key
//! inline tables:
//!
//! ```toml
//! [variables]
//! laps = 0
//!
//! [[objects]]
//! name = "light"
//!
//! [[scripts]]
//! name = "blink"
//! blocks = [
//!     { repeat_until = { condition = { var = "laps", op = ">=", value = 3 }, blocks = [
//!         { enable = "light" },
//!         { wait = 0.5 },
//!         { disable = "light" },
//!         { change = { var = "laps", by = 1 } },
//!     ] } },
//!     { say = { message = "done" } },
//! ]
//! ```
//!
//! Unknown top-level keys are ignored so that tools can keep their own
//! tables alongside the scene.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use runtime::{Table, Variable};

use crate::error::ScriptError;

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, ScriptValue>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub scripts: Vec<ScriptSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    pub name: String,
    /// Initial state; objects start enabled unless told otherwise.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptSpec {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
}

/// One block entry in a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSpec {
    Wait(f64),
    Say {
        message: String,
        #[serde(default)]
        duration: f64,
    },
    PlaySound {
        name: String,
        #[serde(default = "default_volume")]
        volume: f64,
    },
    Log(String),
    Enable(String),
    Disable(String),
    Set {
        var: String,
        value: ScriptValue,
    },
    Change {
        var: String,
        by: f64,
    },
    WaitUntil(ConditionSpec),
    Sequence(Vec<BlockSpec>),
    RepeatForever(Vec<BlockSpec>),
    RepeatWhile {
        condition: ConditionSpec,
        blocks: Vec<BlockSpec>,
    },
    RepeatUntil {
        condition: ConditionSpec,
        blocks: Vec<BlockSpec>,
    },
}

/// Compares a scene variable against a literal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    pub var: String,
    #[serde(default)]
    pub op: CompareOp,
    pub value: ScriptValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    #[default]
    #[serde(alias = "==")]
    Eq,
    #[serde(alias = "!=")]
    Ne,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = "<=")]
    Le,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = ">=")]
    Ge,
}

impl CompareOp {
    /// Numeric comparison when both sides hold numbers or booleans, text
    /// comparison otherwise. Comparisons involving NaN only satisfy `ne`.
    pub fn compare(self, left: &Variable, right: &Variable) -> bool {
        let ordering = if left.is_numeric() && right.is_numeric() {
            left.as_number().partial_cmp(&right.as_number())
        } else {
            Some(left.as_string().cmp(&right.as_string()))
        };

        let Some(ordering) = ordering else {
            return self == CompareOp::Ne;
        };
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// A literal value as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&ScriptValue> for Variable {
    fn from(value: &ScriptValue) -> Self {
        match value {
            ScriptValue::Bool(b) => Variable::Boolean(*b),
            ScriptValue::Integer(n) => Variable::from(*n),
            ScriptValue::Float(f) => Variable::Number(*f),
            ScriptValue::Text(s) => Variable::String(s.clone()),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

impl Scene {
    /// Parse scene source. `file_id` is carried into error spans for
    /// codespan-reporting.
    pub fn parse(source: &str, file_id: usize) -> Result<Scene, ScriptError> {
        toml::from_str(source).map_err(|e| ScriptError::from_toml(e, file_id))
    }

    pub fn load(path: &Path) -> Result<Scene, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source, 0)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("untitled")
    }

    /// The declared variables as a fresh table.
    pub fn initial_variables(&self) -> Table {
        let mut table = Table::new();
        for (name, value) in &self.variables {
            table.set_key(name.clone(), Variable::from(value));
        }
        table
    }
}

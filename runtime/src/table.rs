use std::collections::HashMap;

use crate::error::TableError;
use crate::value::Variable;

/// A Lua-style table: a 1-indexed array of variables plus a string-keyed map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    array: Vec<Variable>,
    fields: HashMap<String, Variable>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the array part.
    pub fn add(&mut self, value: impl Into<Variable>) {
        self.array.push(value.into());
    }

    /// Read the 1-based array slot `index`. Anything outside `1..=len`
    /// reads as a zero-valued number.
    pub fn get(&self, index: i64) -> Variable {
        slot(index, self.array.len())
            .and_then(|i| self.array.get(i))
            .cloned()
            .unwrap_or(Variable::Number(0.0))
    }

    /// Overwrite an existing 1-based array slot. The array never grows here;
    /// use [`Table::add`] to append.
    pub fn set(&mut self, index: i64, value: impl Into<Variable>) -> Result<(), TableError> {
        let len = self.array.len();
        let cell = slot(index, len)
            .and_then(|i| self.array.get_mut(i))
            .ok_or(TableError::IndexOutOfRange { index, len })?;
        *cell = value.into();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Variable> {
        self.array.iter()
    }

    /// Read a keyed field; missing keys read as `Nil`.
    pub fn get_key(&self, key: &str) -> Variable {
        self.fields.get(key).cloned().unwrap_or_default()
    }

    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Variable> {
        self.fields.get_mut(key)
    }

    pub fn set_key(&mut self, key: impl Into<String>, value: impl Into<Variable>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove_key(&mut self, key: &str) -> Option<Variable> {
        self.fields.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }
}

/// Map a 1-based index to a vector offset.
fn slot(index: i64, len: usize) -> Option<usize> {
    let offset = usize::try_from(index).ok()?.checked_sub(1)?;
    (offset < len).then_some(offset)
}

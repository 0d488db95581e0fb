use std::fmt;

/// A loosely typed variable cell, coerced between representations the way
/// Scratch does.
///
/// Booleans are stored as truth values but read as `1`/`0` through the
/// number and string accessors. Strings never parse as numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Variable {
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Variable {
    pub fn as_number(&self) -> f64 {
        match self {
            Variable::Boolean(true) => 1.0,
            Variable::Boolean(false) => 0.0,
            Variable::Number(n) => *n,
            Variable::String(_) | Variable::Nil => 0.0,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Variable::Boolean(true) => "1".to_string(),
            Variable::Boolean(false) => "0".to_string(),
            Variable::Number(n) => format_number(*n),
            Variable::String(s) => s.clone(),
            Variable::Nil => String::new(),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Variable::Boolean(b) => *b,
            Variable::Number(n) => *n != 0.0,
            Variable::String(_) | Variable::Nil => false,
        }
    }

    /// True for the variants that read back a meaningful number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Variable::Boolean(_) | Variable::Number(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Variable::Nil)
    }

    pub fn set_number(&mut self, number: f64) {
        *self = Variable::Number(number);
    }

    pub fn set_bool(&mut self, truth: bool) {
        *self = Variable::Boolean(truth);
    }

    pub fn set_string(&mut self, text: impl Into<String>) {
        *self = Variable::String(text.into());
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Variable::Nil => "Nil",
            Variable::Boolean(_) => "Boolean",
            Variable::Number(_) => "Number",
            Variable::String(_) => "String",
        }
    }
}

/// Integral values print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n == n.floor() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Variable::Boolean(value)
    }
}

impl From<i32> for Variable {
    fn from(value: i32) -> Self {
        Variable::Number(f64::from(value))
    }
}

impl From<i64> for Variable {
    fn from(value: i64) -> Self {
        Variable::Number(value as f64)
    }
}

impl From<f32> for Variable {
    fn from(value: f32) -> Self {
        Variable::Number(f64::from(value))
    }
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Variable::Number(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::String(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::String(value)
    }
}

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Errors raised while loading or compiling a scene.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("{message}")]
    Parse {
        message: String,
        span: Option<Range<usize>>,
        file_id: usize,
    },
    #[error("unknown object '{name}' in script '{script}'")]
    UnknownObject { name: String, script: String },
    #[error("unknown variable '{name}' in script '{script}'")]
    UnknownVariable { name: String, script: String },
    #[error("duplicate object '{0}'")]
    DuplicateObject(String),
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    pub(crate) fn from_toml(error: toml::de::Error, file_id: usize) -> Self {
        ScriptError::Parse {
            message: error.message().to_string(),
            span: error.span(),
            file_id,
        }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ScriptError::Parse { span, .. } => span.clone(),
            _ => None,
        }
    }

    /// Convert to a codespan-reporting diagnostic. Errors without a source
    /// span get a message-only diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(self.to_string());
        match self {
            ScriptError::Parse {
                span: Some(span),
                file_id,
                ..
            } => diagnostic.with_labels(vec![Label::primary(*file_id, span.clone())]),
            ScriptError::UnknownObject { .. } => {
                diagnostic.with_notes(vec!["declare it under [[objects]]".to_string()])
            }
            ScriptError::UnknownVariable { .. } => {
                diagnostic.with_notes(vec!["declare it under [variables]".to_string()])
            }
            _ => diagnostic,
        }
    }
}

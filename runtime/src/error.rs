use thiserror::Error;

/// Errors raised while entering or running blocks.
#[derive(Debug, Error)]
pub enum BlockError {
    /// A block reached for the actions provider before one was installed,
    /// or after the owning context was disposed.
    #[error("actions not initialized: install an actions provider before running blocks")]
    ActionsNotInitialized,
    /// A fallible `Execute` callback reported a failure.
    #[error("callback failed: {0}")]
    Callback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table index {index} out of range (length {len})")]
    IndexOutOfRange { index: i64, len: usize },
}

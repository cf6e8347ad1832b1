use crate::error::TransformError;

/// The operation a worker applies to a job's input.
///
/// Implementations should be pure functions of the input. A panic is caught by
/// the worker and recorded as a job error.
pub trait Transform: Send + Sync {
    fn apply(&self, input: &str) -> Result<String, TransformError>;
}

/// Reference transformation: Unicode-aware uppercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercase;

impl Transform for Uppercase {
    fn apply(&self, input: &str) -> Result<String, TransformError> {
        Ok(input.to_uppercase())
    }
}

//! Error taxonomy shared by the symbolic engine and the equation layer.
//!
//! The variants follow the classes of failure a user of the algebra layer meets:
//! a value that is not an expression, a call shape that is not supported, a missing
//! capability, and an operation that the engine does not implement.

/// Errors raised by symbolic and equation operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgebraError {
    /// A value of the wrong kind was supplied (e.g. a set where an expression is required)
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A value of the right kind but an unsupported shape or content
    #[error("ValueError: {0}")]
    ValueError(String),

    /// The requested method or side does not exist on the target
    #[error("AttributeError: {0}")]
    AttributeError(String),

    /// The operation is deliberately unsupported or beyond the engine
    #[error("NotImplementedError: {0}")]
    NotImplemented(String),

    /// Malformed expression text
    #[error("ParseError: {0}")]
    Parse(String),
}

/// Result type for algebra operations
pub type Result<T> = std::result::Result<T, AlgebraError>;

impl AlgebraError {
    /// short class name of the error, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AlgebraError::TypeError(_) => "TypeError",
            AlgebraError::ValueError(_) => "ValueError",
            AlgebraError::AttributeError(_) => "AttributeError",
            AlgebraError::NotImplemented(_) => "NotImplementedError",
            AlgebraError::Parse(_) => "ParseError",
        }
    }
}

//! Error types for sqlweave.

use thiserror::Error;

use crate::ast::ValueType;

/// Everything that can go wrong while building or compiling an expression.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A column was bound to a field that belongs to a different row instance.
    #[error("Ambiguous row: field '{field}' is not owned by this instance of '{table}'")]
    AmbiguousRow { table: String, field: String },

    /// The row definition has no field with this name.
    #[error("Unknown field '{field}' on table '{table}'")]
    UnknownField { table: String, field: String },

    /// An operation received the wrong number of operands.
    #[error("{operation} expects {expected} operand(s), got {got}")]
    Arity {
        operation: String,
        expected: String,
        got: usize,
    },

    /// Contributing declarations disagree on the inferred type.
    #[error("Type mismatch in {context}: expected {expected}, got {got}")]
    TypeMismatch {
        context: String,
        expected: String,
        got: String,
    },

    /// The dialect neither implements nor can reformulate a capability.
    #[error("Unsupported operation: {dialect} does not support {capability}")]
    Unsupported {
        dialect: &'static str,
        capability: String,
    },

    /// A literal that cannot be rendered as SQL.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Dialect lookup by name failed.
    #[error("Unknown dialect '{name}'{}", .suggestion.as_ref().map(|s| format!(". Did you mean '{}'?", s)).unwrap_or_default())]
    UnknownDialect {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Create an unsupported-capability error.
    pub fn unsupported(dialect: &'static str, capability: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            capability: capability.into(),
        }
    }

    /// Create a type mismatch between two value types.
    pub fn type_mismatch(context: impl Into<String>, expected: ValueType, got: ValueType) -> Self {
        Self::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Create an arity error.
    pub fn arity(operation: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        Self::Arity {
            operation: operation.into(),
            expected: expected.into(),
            got,
        }
    }
}

/// Result type alias for sqlweave operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = CompileError::unsupported("derby", "window functions");
        assert_eq!(
            err.to_string(),
            "Unsupported operation: derby does not support window functions"
        );
    }

    #[test]
    fn test_unknown_dialect_display() {
        let err = CompileError::UnknownDialect {
            name: "postgress".to_string(),
            suggestion: Some("postgres".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unknown dialect 'postgress'. Did you mean 'postgres'?"
        );

        let err = CompileError::UnknownDialect {
            name: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Unknown dialect 'zzz'");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = CompileError::type_mismatch("COALESCE", ValueType::String, ValueType::Integer);
        assert_eq!(
            err.to_string(),
            "Type mismatch in COALESCE: expected string, got integer"
        );
    }
}

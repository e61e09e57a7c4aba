use thiserror::Error;

use crate::expression::ExpressionError;

use super::types::ParamType;

/// Error type for expression type inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeCheckError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Malformed expression: {message}")]
    MalformedExpression { message: String },

    #[error("'{name}' is a {found}, not a function")]
    NotAFunction { name: String, found: ParamType },

    #[error("Function '{function}' does not take {found} argument(s)")]
    ArityMismatch { function: String, found: usize },

    #[error("Invalid argument types for function '{function}': {}", format_types(.found))]
    InvalidArgumentType {
        function: String,
        found: Vec<ParamType>,
    },
}

fn format_types(types: &[ParamType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeCheckError {
    pub fn malformed(message: impl Into<String>) -> Self {
        TypeCheckError::MalformedExpression {
            message: message.into(),
        }
    }
}

impl From<ExpressionError> for TypeCheckError {
    fn from(error: ExpressionError) -> Self {
        TypeCheckError::malformed(error.to_string())
    }
}

pub type TypeCheckResult<T> = Result<T, TypeCheckError>;

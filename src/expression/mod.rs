//! Parameter expressions embedded in content as `{{ ... }}` blocks.

pub mod ast;
pub mod interpolation;
pub mod parser;

use thiserror::Error;

pub use ast::Expr;
pub use interpolation::{interpolated_expressions, params_referenced_in};
pub use parser::parse_expression;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Malformed expression '{expression}': {message}")]
    Malformed { expression: String, message: String },
}

impl ExpressionError {
    pub fn malformed(expression: impl Into<String>, message: impl Into<String>) -> Self {
        ExpressionError::Malformed {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

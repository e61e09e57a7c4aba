use thiserror::Error;

use crate::classifier::ClassificationError;
use crate::expression::ExpressionError;
use crate::graph::GraphError;
use crate::rules::RuleError;
use crate::session::SessionError;
use crate::type_checker::TypeCheckError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),
    // expressions
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),
    #[error("Type check error: {0}")]
    TypeCheck(#[from] TypeCheckError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

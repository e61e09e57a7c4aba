use tracing::debug;

use crate::expression::{parse_expression, Expr};

use super::{
    environment::TypeEnvironments, types::ParamType, TypeCheckError, TypeCheckResult,
};

/// Infers the type of each node of an expression tree.
pub trait ExpressionTypeChecker {
    fn infer_literal_type(&self, literal: &str) -> ParamType;
    fn infer_variable_type(&self, name: &str, envs: &TypeEnvironments)
        -> TypeCheckResult<ParamType>;
    fn infer_apply_type(
        &self,
        function: &str,
        args: &[ParamType],
        envs: &TypeEnvironments,
    ) -> TypeCheckResult<ParamType>;

    fn infer(&self, expr: &Expr, envs: &TypeEnvironments) -> TypeCheckResult<ParamType> {
        match expr {
            Expr::Literal(literal) => Ok(self.infer_literal_type(literal)),
            Expr::Variable(name) => self.infer_variable_type(name, envs),
            Expr::Apply { function, args } => {
                if function.is_empty() {
                    return Err(TypeCheckError::malformed(
                        "intermediate node has no function name",
                    ));
                }
                let arg_types = args
                    .iter()
                    .map(|arg| self.infer(arg, envs))
                    .collect::<TypeCheckResult<Vec<_>>>()?;
                self.infer_apply_type(function, &arg_types, envs)
            }
        }
    }
}

/// Whether a literal reads as a number in the editor's numeric grammar.
///
/// Blank text is zero. Decimal forms take an optional sign, fraction and
/// exponent. `0x`, `0o` and `0b` prefixes are unsigned. `Infinity` is the
/// only word accepted, so `inf` and `nan` stay strings.
fn is_numeric_literal(literal: &str) -> bool {
    let text = literal.trim();
    if text.is_empty() {
        return true;
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let lowered = text.get(..2).map(str::to_ascii_lowercase);
        if lowered.as_deref() == Some(prefix) {
            let digits = &text[2..];
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }
    let unsigned = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);
    if unsigned == "Infinity" {
        return true;
    }
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') && text.parse::<f64>().is_ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpressionChecker;

impl DefaultExpressionChecker {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionTypeChecker for DefaultExpressionChecker {
    fn infer_literal_type(&self, literal: &str) -> ParamType {
        if is_numeric_literal(literal) {
            ParamType::Real
        } else {
            ParamType::UnicodeString
        }
    }

    fn infer_variable_type(
        &self,
        name: &str,
        envs: &TypeEnvironments,
    ) -> TypeCheckResult<ParamType> {
        envs.lookup(name)
            .cloned()
            .ok_or_else(|| TypeCheckError::UndefinedVariable(name.to_string()))
    }

    fn infer_apply_type(
        &self,
        function: &str,
        args: &[ParamType],
        envs: &TypeEnvironments,
    ) -> TypeCheckResult<ParamType> {
        let function_type = match self.infer_variable_type(function, envs)? {
            ParamType::Function(function_type) => function_type,
            other => {
                return Err(TypeCheckError::NotAFunction {
                    name: function.to_string(),
                    found: other,
                })
            }
        };
        if !function_type.accepts_arity(args.len()) {
            return Err(TypeCheckError::ArityMismatch {
                function: function.to_string(),
                found: args.len(),
            });
        }
        function_type
            .return_type(args)
            .ok_or_else(|| TypeCheckError::InvalidArgumentType {
                function: function.to_string(),
                found: args.to_vec(),
            })
    }
}

/// Parses `source` and infers its type. `envs` is searched first to last for
/// every name, so earlier environments shadow later ones.
#[tracing::instrument(level = "debug", skip(envs))]
pub fn infer_type(source: &str, envs: &TypeEnvironments) -> TypeCheckResult<ParamType> {
    let expr = parse_expression(source)?;
    let ty = DefaultExpressionChecker::new().infer(&expr, envs)?;
    debug!(%ty, "inferred expression type");
    Ok(ty)
}

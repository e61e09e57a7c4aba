use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of a parameter or of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamType {
    Real,
    UnicodeString,
    Boolean,
    Function(FunctionType),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Real => write!(f, "Real"),
            ParamType::UnicodeString => write!(f, "UnicodeString"),
            ParamType::Boolean => write!(f, "Boolean"),
            ParamType::Function(function) => write!(f, "Function({})", function.name),
        }
    }
}

/// One parameter slot of a function signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamPattern {
    Exact(ParamType),
    Any,
}

impl ParamPattern {
    pub fn accepts(&self, ty: &ParamType) -> bool {
        match self {
            ParamPattern::Exact(expected) => expected == ty,
            ParamPattern::Any => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReturnType {
    Fixed(ParamType),
    /// The type bound to the `Any` slots of the call.
    SameAsAny,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overload {
    pub params: Vec<ParamPattern>,
    /// All `Any` slots must receive arguments of one and the same type.
    #[serde(default)]
    pub same_type: bool,
    pub returns: ReturnType,
}

impl Overload {
    pub fn new(params: Vec<ParamPattern>, returns: ParamType) -> Self {
        Self {
            params,
            same_type: false,
            returns: ReturnType::Fixed(returns),
        }
    }

    pub fn same_type(mut self) -> Self {
        self.same_type = true;
        self
    }

    pub fn returning_any(mut self) -> Self {
        self.returns = ReturnType::SameAsAny;
        self
    }

    /// Return type of a call with `args`, or `None` if the call does not fit.
    pub fn apply(&self, args: &[ParamType]) -> Option<ParamType> {
        if self.params.len() != args.len() {
            return None;
        }
        if !self
            .params
            .iter()
            .zip(args)
            .all(|(pattern, arg)| pattern.accepts(arg))
        {
            return None;
        }
        let mut any_args = self
            .params
            .iter()
            .zip(args)
            .filter(|(pattern, _)| matches!(pattern, ParamPattern::Any))
            .map(|(_, arg)| arg);
        let bound = any_args.next();
        if self.same_type {
            if let Some(bound) = bound {
                if any_args.any(|arg| arg != bound) {
                    return None;
                }
            }
        }
        match &self.returns {
            ReturnType::Fixed(ty) => Some(ty.clone()),
            ReturnType::SameAsAny => bound.cloned(),
        }
    }
}

/// A named function and its accepted signatures, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    pub name: String,
    pub overloads: Vec<Overload>,
}

impl FunctionType {
    pub fn new(name: impl Into<String>, overloads: Vec<Overload>) -> Self {
        Self {
            name: name.into(),
            overloads,
        }
    }

    pub fn accepts_arity(&self, arity: usize) -> bool {
        self.overloads
            .iter()
            .any(|overload| overload.params.len() == arity)
    }

    pub fn return_type(&self, args: &[ParamType]) -> Option<ParamType> {
        self.overloads
            .iter()
            .find_map(|overload| overload.apply(args))
    }
}

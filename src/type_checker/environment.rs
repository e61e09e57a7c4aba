use std::collections::HashMap;

use lazy_static::lazy_static;

use super::types::{FunctionType, Overload, ParamPattern, ParamType};

/// One name -> type mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEnvironment {
    pub types: HashMap<String, ParamType>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: ParamType) {
        self.types.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&ParamType> {
        self.types.get(name)
    }
}

impl<K: Into<String>> FromIterator<(K, ParamType)> for TypeEnvironment {
    fn from_iter<T: IntoIterator<Item = (K, ParamType)>>(iter: T) -> Self {
        Self {
            types: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ordered stack of environments. The first layer shadows every later one,
/// so callers list the innermost scope first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEnvironments {
    layers: Vec<TypeEnvironment>,
}

impl TypeEnvironments {
    pub fn new(layers: Vec<TypeEnvironment>) -> Self {
        Self { layers }
    }

    /// Appends the operator and builtin function signatures as the layer of
    /// lowest precedence.
    pub fn with_system(mut self) -> Self {
        self.layers.push(SYSTEM_ENVIRONMENT.clone());
        self
    }

    pub fn push(&mut self, layer: TypeEnvironment) {
        self.layers.push(layer);
    }

    pub fn lookup(&self, name: &str) -> Option<&ParamType> {
        self.layers.iter().find_map(|layer| layer.get(name))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

fn function(name: &str, overloads: Vec<Overload>) -> (String, ParamType) {
    (
        name.to_string(),
        ParamType::Function(FunctionType::new(name, overloads)),
    )
}

fn exact(types: &[ParamType]) -> Vec<ParamPattern> {
    types.iter().cloned().map(ParamPattern::Exact).collect()
}

fn system_environment() -> TypeEnvironment {
    use ParamType::{Boolean, Real};

    let arithmetic = |name: &str| function(name, vec![Overload::new(exact(&[Real, Real]), Real)]);
    let ordering =
        |name: &str| function(name, vec![Overload::new(exact(&[Real, Real]), Boolean)]);
    let logical =
        |name: &str| function(name, vec![Overload::new(exact(&[Boolean, Boolean]), Boolean)]);
    let equality = |name: &str| {
        function(
            name,
            vec![Overload::new(vec![ParamPattern::Any, ParamPattern::Any], Boolean).same_type()],
        )
    };

    [
        function(
            "+",
            vec![
                Overload::new(exact(&[Real, Real]), Real),
                Overload::new(exact(&[Real]), Real),
            ],
        ),
        function(
            "-",
            vec![
                Overload::new(exact(&[Real, Real]), Real),
                Overload::new(exact(&[Real]), Real),
            ],
        ),
        arithmetic("*"),
        arithmetic("/"),
        arithmetic("%"),
        arithmetic("pow"),
        arithmetic("log"),
        function("floor", vec![Overload::new(exact(&[Real]), Real)]),
        function("abs", vec![Overload::new(exact(&[Real]), Real)]),
        ordering("<"),
        ordering("<="),
        ordering(">"),
        ordering(">="),
        equality("=="),
        equality("!="),
        logical("&&"),
        logical("||"),
        function("!", vec![Overload::new(exact(&[Boolean]), Boolean)]),
        function(
            "if",
            vec![Overload::new(
                vec![
                    ParamPattern::Exact(Boolean),
                    ParamPattern::Any,
                    ParamPattern::Any,
                ],
                Boolean,
            )
            .same_type()
            .returning_any()],
        ),
    ]
    .into_iter()
    .collect()
}

lazy_static! {
    static ref SYSTEM_ENVIRONMENT: TypeEnvironment = system_environment();
}

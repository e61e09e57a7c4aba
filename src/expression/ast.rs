use std::{collections::BTreeSet, fmt};

/// Parse tree of a parameter expression.
///
/// Operators are not special: `a + 1` is the application of the function
/// named `+` to `a` and `1`, so the type checker only has to know about
/// literals, variables and applications.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Source text of a number or the contents of a quoted string.
    Literal(String),
    Variable(String),
    Apply { function: String, args: Vec<Expr> },
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn apply(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Apply {
            function: function.into(),
            args,
        }
    }

    /// Names read as parameters, excluding function names.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Variable(name) => {
                names.insert(name.clone());
            }
            Expr::Apply { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{:?}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Apply { function, args } => {
                write!(f, "({}", function)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

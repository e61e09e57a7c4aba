//! Static typing of parameter expressions
//!
//! Authors write expressions such as `{{ score * 2 }}` into card content and
//! parameter changes. Before a learner ever sees them, the editor checks that
//! every name is defined and that functions are applied to arguments they
//! accept.
//!
//! # Model
//!
//! - Every operator is an ordinary function (`+`, `<=`, `&&`, ...), looked
//!   up by name like any parameter.
//! - Names resolve through [`TypeEnvironments`], an ordered list where the
//!   first environment shadows all later ones.
//! - [`TypeEnvironments::with_system`] appends the builtin signatures as the
//!   last layer, so a parameter named `floor` hides the builtin.
//!
//! # Inference
//!
//! - Literal: [`ParamType::Real`] if the text is a number, otherwise
//!   [`ParamType::UnicodeString`].
//! - Variable: its type in the first environment that defines it, otherwise
//!   [`TypeCheckError::UndefinedVariable`].
//! - Application: the return type of the first overload of the function that
//!   accepts the inferred argument types.
//!
//! ```rust
//! use exploration_core::type_checker::{
//!     infer_type, ParamType, TypeEnvironment, TypeEnvironments,
//! };
//!
//! let envs = TypeEnvironments::new(vec![
//!     TypeEnvironment::new().with("score", ParamType::Real),
//! ])
//! .with_system();
//! assert_eq!(infer_type("score * 2 < 10", &envs).unwrap(), ParamType::Boolean);
//! ```

pub mod checker;
pub mod environment;
mod error;
pub mod types;

pub use checker::{infer_type, DefaultExpressionChecker, ExpressionTypeChecker};
pub use environment::{TypeEnvironment, TypeEnvironments};
pub use error::{TypeCheckError, TypeCheckResult};
pub use types::{FunctionType, Overload, ParamPattern, ParamType, ReturnType};

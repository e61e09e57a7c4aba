//! # exploration-core: authoring engine for branching lessons
//!
//! An exploration is a directed graph of named cards ("states"). Each card
//! shows content and asks the learner for an answer through one
//! interaction; the interaction's answer groups decide which card comes
//! next. This crate holds the editor-side logic that keeps such a graph
//! consistent.
//!
//! ## Components
//!
//! - State graph model ([`graph`]): cards, outcomes, name validation and
//!   graph mutations that keep destinations consistent.
//! - Rule evaluation ([`rules`]): the [`rules::RuleEvaluator`] seam plus a
//!   registry of built-in interaction rule families.
//! - Answer classification ([`classifier`]): explicit rules, then a
//!   statistical model, then training data, then the default outcome.
//!   Also hosts the solution verifier.
//! - Warnings analyzer ([`warnings`]): reachability, parameter scope,
//!   interaction validation and top-answer checks, reported as
//!   [`warnings::Warning`]s instead of errors.
//! - Parameter expressions ([`expression`], [`type_checker`]): the `{{ }}`
//!   expression grammar and type inference over layered environments.
//! - Editing session ([`session`]): owns one graph and records author edits
//!   as a backend change list.
//!
//! ## Error model
//!
//! Every component has its own error enum; [`Error`] aggregates them.
//! Data-quality problems in an exploration are never errors: the analyzer
//! turns them into warnings.
//!
//! ```text
//! exploration JSON → StateGraph → AnswerClassifier / ExplorationWarnings
//!                         ↑
//!            ExplorationEditingSession (change list)
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod expression;
pub mod graph;
pub mod rules;
pub mod session;
pub mod type_checker;
pub mod warnings;

// Re-exports
pub use error::*;

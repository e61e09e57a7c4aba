use std::{collections::BTreeSet, fmt};

use crate::{
    expression::params_referenced_in,
    graph::{ParamChange, StateGraph},
};

use super::reachability::bfs_order;

/// Where an undefined parameter was read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamContext {
    InitialParamChanges,
    State(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedParamUse {
    pub param: String,
    pub context: ParamContext,
}

impl fmt::Display for UndefinedParamUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            ParamContext::InitialParamChanges => write!(
                f,
                "Please ensure the value of parameter \"{}\" is set before it is referred to in the initial list of parameter changes.",
                self.param
            ),
            ParamContext::State(state_name) => write!(
                f,
                "Please ensure the value of parameter \"{}\" is set before using it in \"{}\".",
                self.param, state_name
            ),
        }
    }
}

#[derive(Debug, Default)]
struct ParamWalk {
    defined: BTreeSet<String>,
    reported: BTreeSet<(String, ParamContext)>,
    uses: Vec<UndefinedParamUse>,
}

impl ParamWalk {
    fn read(&mut self, params: BTreeSet<String>, context: &ParamContext) {
        for param in params {
            if self.defined.contains(&param) {
                continue;
            }
            if self.reported.insert((param.clone(), context.clone())) {
                self.uses.push(UndefinedParamUse {
                    param,
                    context: context.clone(),
                });
            }
        }
    }

    /// A change reads its template first and then sets its own name.
    fn apply(&mut self, param_changes: &[ParamChange], context: &ParamContext) {
        for change in param_changes {
            if let Some(template) = change.templated_value() {
                self.read(params_referenced_in(template), context);
            }
            self.defined.insert(change.name.clone());
        }
    }
}

/// Simulates the exploration's parameter changes and reports every
/// parameter read before any change has set it.
///
/// The initial list runs first. Cards are then visited breadth-first from
/// the initial card: their own parameter changes, their content and their
/// feedback. Cards that cannot be reached are never visited.
pub fn undefined_param_uses(
    graph: &StateGraph,
    init_state_name: &str,
    initial_param_changes: &[ParamChange],
) -> Vec<UndefinedParamUse> {
    let mut walk = ParamWalk::default();
    walk.apply(initial_param_changes, &ParamContext::InitialParamChanges);

    for name in bfs_order(graph, init_state_name) {
        let Some(state) = graph.get_state(&name) else {
            continue;
        };
        let context = ParamContext::State(name.clone());
        walk.apply(&state.param_changes, &context);
        walk.read(params_referenced_in(&state.content.html), &context);
        for html in state.feedback_html() {
            walk.read(params_referenced_in(html), &context);
        }
    }
    walk.uses
}

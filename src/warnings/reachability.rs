use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
    graph::{StateGraph, END_DEST},
    rules::InteractionRegistry,
};

/// Cards in breadth-first order from `init_state_name`. Destinations that do
/// not name a card are ignored.
pub fn bfs_order(graph: &StateGraph, init_state_name: &str) -> Vec<String> {
    let mut order = Vec::new();
    if !graph.has_state(init_state_name) {
        return order;
    }
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    seen.insert(init_state_name.to_string());
    queue.push_back(init_state_name.to_string());
    while let Some(name) = queue.pop_front() {
        for dest in graph.destinations(&name) {
            if graph.has_state(&dest) && seen.insert(dest.clone()) {
                queue.push_back(dest);
            }
        }
        order.push(name);
    }
    order
}

/// Cards that no path from `init_state_name` visits.
pub fn unreachable_states(graph: &StateGraph, init_state_name: &str) -> BTreeSet<String> {
    let reachable: BTreeSet<String> = bfs_order(graph, init_state_name).into_iter().collect();
    graph
        .state_names()
        .into_iter()
        .filter(|name| !reachable.contains(name))
        .collect()
}

/// Cards from which some terminal card, or the `END` sentinel, can be
/// reached.
pub fn states_reaching_completion(
    graph: &StateGraph,
    interactions: &InteractionRegistry,
) -> BTreeSet<String> {
    let mut inbound: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut queue = VecDeque::new();
    let mut completes = BTreeSet::new();

    for state in graph.states() {
        let destinations = graph.destinations(&state.name);
        let is_terminal = state
            .interaction
            .interaction_id()
            .is_some_and(|id| interactions.is_terminal(id));
        if is_terminal || destinations.contains(END_DEST) {
            completes.insert(state.name.clone());
            queue.push_back(state.name.clone());
        }
        for dest in destinations {
            inbound.entry(dest).or_default().insert(state.name.clone());
        }
    }

    while let Some(name) = queue.pop_front() {
        let Some(sources) = inbound.get(&name) else {
            continue;
        };
        for source in sources {
            if completes.insert(source.clone()) {
                queue.push_back(source.clone());
            }
        }
    }
    completes
}

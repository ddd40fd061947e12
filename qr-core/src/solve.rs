//! Top-level orchestration: model → admissible states → transition graph
//! → optional path overlay. Mirrors the source's single `solve()` entry
//! point, generalised to expose each stage's output to callers that only
//! need part of the pipeline (e.g. the CLI's `validate` subcommand stops
//! after enumeration).

use crate::enumerator::enumerate_admissible_states;
use crate::error::Result;
use crate::model::Model;
use crate::path::{find_path, PathOutcome};
use crate::state::{State, StateId};
use crate::transitions::{generate_graph, TransitionGraph, DEFAULT_SUBSET_CAP};
use tracing::instrument;

/// Everything produced by solving a model: the admissible states (in
/// enumeration order) and the transition graph built over them.
pub struct Solution {
    /// Every admissible state, in the order the enumerator produced them.
    pub states: Vec<State>,
    /// The transition graph over `states`.
    pub graph: TransitionGraph,
}

/// Enumerate the admissible state set and generate the transition graph,
/// using [`DEFAULT_SUBSET_CAP`].
#[instrument(skip(model), fields(quantities = model.len()))]
pub fn solve(model: &Model) -> Solution {
    solve_with_subset_cap(model, DEFAULT_SUBSET_CAP)
}

/// As [`solve`], with an explicit subset-size cap.
#[instrument(skip(model), fields(quantities = model.len(), subset_cap))]
pub fn solve_with_subset_cap(model: &Model, subset_cap: usize) -> Solution {
    let states = enumerate_admissible_states(model);
    tracing::debug!(admissible_states = states.len(), "enumeration complete");
    let graph = generate_graph(model, &states, subset_cap);
    tracing::debug!(edges = graph.edge_count(), "transition generation complete");
    Solution { states, graph }
}

/// Search for a path between `start` and `target` over an already-built
/// transition graph.
#[instrument(skip(graph))]
pub fn solve_path(graph: &TransitionGraph, start: StateId, target: StateId) -> Result<PathOutcome> {
    find_path(graph, start, target)
}

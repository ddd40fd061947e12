//! Transition generation: the fixed-point iteration that turns an
//! admissible state set into a directed graph of qualitative behaviour.

use crate::model::{Model, QuantityId, RelationKind};
use crate::state::State;
use crate::value::{Derivative, Landmark};
use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use std::sync::Mutex;

/// Default cap on the number of quantities whose magnitude may shift in a
/// single transition (spec's Open Question: tunable with a documented
/// default).
pub const DEFAULT_SUBSET_CAP: usize = 3;

/// A directed graph over admissible states: edges plus the states they
/// connect, addressed by [`crate::state::StateId`].
pub struct TransitionGraph {
    /// Every admissible state, by id.
    pub states: AHashMap<crate::state::StateId, State>,
    /// Successor ids for each state id.
    pub edges: AHashMap<crate::state::StateId, AHashSet<crate::state::StateId>>,
}

impl TransitionGraph {
    /// Number of distinct edges across the whole graph.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|s| s.len()).sum()
    }
}

/// Build the transition graph over `states` by iterating §4.3 to a fixed
/// point. `subset_cap` bounds how many quantities may shift magnitude in a
/// single transition (1..=subset_cap); pass [`DEFAULT_SUBSET_CAP`] absent
/// a caller override.
pub fn generate_graph(model: &Model, states: &[State], subset_cap: usize) -> TransitionGraph {
    let states_by_id: AHashMap<_, _> = states.iter().map(|s| (s.id(), s.clone())).collect();
    let edges: Mutex<AHashMap<_, AHashSet<_>>> =
        Mutex::new(states_by_id.keys().map(|id| (*id, AHashSet::default())).collect());

    let subsets = quantity_subsets(model.len(), subset_cap);
    let randomized_quantities: Vec<QuantityId> = model.randomized_quantities().collect();

    loop {
        let progressed = states
            .par_iter()
            .map(|state| {
                let mut local_new_edges: Vec<(crate::state::StateId, crate::state::StateId)> = Vec::new();
                let random_choices = random_derivative_choices(&randomized_quantities, state);

                for subset in &subsets {
                    for choice in &random_choices {
                        let mut candidate = apply_derivatives(model, state, subset);
                        apply_relations_once(model, &mut candidate);
                        if let Some((r, next_derivative)) = choice {
                            if subset.contains(r) {
                                let magnitude = candidate.magnitude(*r);
                                candidate = candidate.with_value(*r, (magnitude, *next_derivative));
                            }
                        }

                        let candidate_id = candidate.id();
                        if candidate_id == state.id() {
                            continue;
                        }
                        if !states_by_id.contains_key(&candidate_id) {
                            continue;
                        }
                        local_new_edges.push((state.id(), candidate_id));
                    }
                }

                local_new_edges
            })
            .reduce(
                || false,
                |progress_so_far, local_new_edges| {
                    let mut edges = edges.lock().expect("edges mutex poisoned");
                    let mut made_progress = progress_so_far;
                    for (from, to) in local_new_edges {
                        if edges.entry(from).or_default().insert(to) {
                            made_progress = true;
                        }
                    }
                    made_progress
                },
            );

        if !progressed {
            break;
        }
    }

    TransitionGraph {
        states: states_by_id,
        edges: edges.into_inner().expect("edges mutex poisoned"),
    }
}

/// Shift the magnitude of every quantity in `subset` by its current
/// derivative, clamped to the quantity's valid magnitude-index range.
/// Derivatives are left untouched by this step.
fn apply_derivatives(model: &Model, state: &State, subset: &[QuantityId]) -> State {
    let mut next = state.clone();
    for &q in subset {
        let quantity = &model.quantities[q];
        let (magnitude, derivative) = next.values[q];
        let index_now = quantity
            .possible_magnitudes
            .iter()
            .position(|m| *m == magnitude)
            .expect("state magnitudes are always members of their quantity's range");
        let shifted = index_now as i64 + derivative.code() as i64;
        let index_new = shifted.clamp(0, quantity.possible_magnitudes.len() as i64 - 1) as usize;
        next.values[q] = (quantity.possible_magnitudes[index_new], derivative);
    }
    next
}

/// Recompute every quantity's derivative from its incoming relations'
/// sign-set, overwriting only when the sign-set yields a single
/// unambiguous derivative that differs from the current one.
///
/// Updates are sequential, not simultaneous: each quantity is processed in
/// declared order and written back into `state` immediately, so a later
/// quantity in the pass reads an earlier quantity's freshly propagated
/// derivative, matching the source's in-place `appy_relations` loop.
fn apply_relations_once(model: &Model, state: &mut State) {
    for i in 0..model.len() {
        let quantity = &model.quantities[i];
        let mut saw_negative = false;
        let mut saw_positive = false;
        let mut saw_zero = false;

        for &(relation_id, from) in &quantity.incoming {
            let relation = &model.relations[relation_id];
            let contribution = match relation.kind {
                RelationKind::Influence => {
                    let from_nonzero = state.magnitude(from) != Landmark::Null;
                    relation.sign.apply(from_nonzero as i8)
                }
                RelationKind::Proportional => relation.sign.apply(state.derivative(from).code()),
                RelationKind::ValueConstraint => continue,
            };
            match contribution {
                c if c < 0 => saw_negative = true,
                0 => saw_zero = true,
                _ => saw_positive = true,
            }
        }

        let current = state.derivative(i);
        // "len(signs) == 1" in the source means the distinct sign set is
        // exactly {0}; expressed here as "zero seen and nothing else was".
        let new_derivative = if saw_negative && saw_positive {
            None
        } else if saw_negative && current != Derivative::Down {
            Some(Derivative::Down)
        } else if saw_positive && current != Derivative::Up {
            Some(Derivative::Up)
        } else if saw_zero && !saw_negative && !saw_positive && current != Derivative::Steady {
            Some(Derivative::Steady)
        } else {
            None
        };

        if let Some(d) = new_derivative {
            state.values[i].1 = d;
        }
    }
}

/// Every subset of quantity indices of size `1..=cap`.
fn quantity_subsets(n: usize, cap: usize) -> Vec<Vec<QuantityId>> {
    let mut result = Vec::new();
    for size in 1..=cap.min(n) {
        let mut combo = Vec::with_capacity(size);
        combinations(n, size, 0, &mut combo, &mut result);
    }
    result
}

fn combinations(n: usize, size: usize, start: usize, combo: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if combo.len() == size {
        out.push(combo.clone());
        return;
    }
    for i in start..n {
        combo.push(i);
        combinations(n, size, i + 1, combo, out);
        combo.pop();
    }
}

/// The `(randomized quantity, candidate next derivative)` pairs to try from
/// `state`. When the model has no randomized quantities, returns a single
/// `None` entry so the subset/derivative pass still runs once per subset
/// and discovers endogenous transitions.
///
/// Candidate derivatives are bounded to `|d* - derivative_r(state)| <= 1`,
/// mirroring the source's `[x for x in range(-1,2) if abs(x - current) < 2]`
/// — an exogenous quantity's derivative may only step by one per transition,
/// same as an endogenous one.
fn random_derivative_choices(
    randomized: &[QuantityId],
    state: &State,
) -> Vec<Option<(QuantityId, Derivative)>> {
    if randomized.is_empty() {
        return vec![None];
    }

    let mut choices = Vec::new();
    for &r in randomized {
        let current = state.derivative(r).code();
        for d in Derivative::ALL {
            if (d.code() as i64 - current as i64).abs() <= 1 {
                choices.push(Some((r, d)));
            }
        }
    }
    choices
}

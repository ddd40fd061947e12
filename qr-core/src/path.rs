//! A* shortest-path search over a transition graph.

use crate::error::{QrError, Result};
use crate::state::StateId;
use crate::transitions::TransitionGraph;
use ahash::{AHashMap, AHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// The outcome of a path search: either a predecessor map reconstructible
/// into a start-to-target edge sequence, or a distinguished "unreachable"
/// sentinel. `NoPath` is not an error — callers disable the path overlay
/// and the solver still emits the full graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// `target` was reached; maps each state on the path to its
    /// predecessor, excluding `start`.
    Found(AHashMap<StateId, StateId>),
    /// The open set was exhausted before `target` was reached.
    NoPath,
}

/// Find the shortest path from `start` to `target` in `graph`.
///
/// `g(s)` is edge count from `start`; the heuristic is Manhattan distance
/// over the interleaved `(magnitude, derivative)` value vector, admissible
/// because every edge changes each quantity's magnitude index and
/// derivative by at most 1.
///
/// Returns [`QrError::DomainError`] if `start == target` or either
/// endpoint is not a state in `graph`.
pub fn find_path(graph: &TransitionGraph, start: StateId, target: StateId) -> Result<PathOutcome> {
    if start == target {
        return Err(QrError::DomainError(
            "start and target states must differ".into(),
        ));
    }
    let start_state = graph
        .states
        .get(&start)
        .ok_or_else(|| QrError::DomainError("start state is not in the admissible set".into()))?;
    let target_state = graph.states.get(&target).ok_or_else(|| {
        QrError::DomainError("target state is not in the admissible set".into())
    })?;

    let h0 = manhattan_distance(start_state, target_state);

    // Min-heap on (f, g, state) ordered ascending via Reverse.
    let mut open: BinaryHeap<Reverse<(i64, i64, StateId)>> = BinaryHeap::new();
    open.push(Reverse((h0, 0, start)));

    let mut best_g: AHashMap<StateId, i64> = AHashMap::new();
    best_g.insert(start, 0);
    let mut predecessor: AHashMap<StateId, StateId> = AHashMap::new();
    let mut closed: AHashSet<StateId> = AHashSet::default();

    while let Some(Reverse((_, g, current))) = open.pop() {
        if current == target {
            return Ok(PathOutcome::Found(predecessor));
        }
        if closed.contains(&current) {
            continue;
        }
        closed.insert(current);

        let Some(successors) = graph.edges.get(&current) else {
            continue;
        };
        for &next in successors {
            if closed.contains(&next) {
                continue;
            }
            let next_g = g + 1;
            let improves = best_g.get(&next).map_or(true, |&known| next_g < known);
            if !improves {
                continue;
            }
            best_g.insert(next, next_g);
            predecessor.insert(next, current);

            if next == target {
                return Ok(PathOutcome::Found(predecessor));
            }

            let next_state = &graph.states[&next];
            let h = manhattan_distance(next_state, target_state);
            open.push(Reverse((next_g + h, next_g, next)));
        }
    }

    Ok(PathOutcome::NoPath)
}

/// Manhattan distance over the interleaved `(magnitude, derivative)` value
/// vector, using each landmark/derivative's canonical integer code.
fn manhattan_distance(a: &crate::state::State, b: &crate::state::State) -> i64 {
    a.values
        .iter()
        .zip(b.values.iter())
        .map(|((am, ad), (bm, bd))| {
            (am.code() as i64 - bm.code() as i64).abs() + (ad.code() as i64 - bd.code() as i64).abs()
        })
        .sum()
}

/// Walk a predecessor map from `target` back to `start`, producing the
/// edge sequence in forward order (`start` first).
pub fn reconstruct_path(
    predecessor: &AHashMap<StateId, StateId>,
    start: StateId,
    target: StateId,
) -> Vec<StateId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match predecessor.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, RelationKind};
    use crate::value::{Derivative, Landmark, Sign};
    use crate::{enumerator::enumerate_admissible_states, transitions::generate_graph};

    fn sink_model() -> Model {
        Model::build(
            vec![],
            vec![],
            vec![
                ("inflow".into(), vec![Landmark::Null, Landmark::Pos], Derivative::ALL.to_vec(), true),
                ("volume".into(), vec![Landmark::Null, Landmark::Pos, Landmark::Max], Derivative::ALL.to_vec(), false),
                ("outflow".into(), vec![Landmark::Null, Landmark::Pos, Landmark::Max], Derivative::ALL.to_vec(), false),
            ],
            vec![
                (RelationKind::Influence, Sign::Positive, "inflow".into(), "volume".into()),
                (RelationKind::Influence, Sign::Negative, "outflow".into(), "volume".into()),
                (RelationKind::Proportional, Sign::Positive, "volume".into(), "outflow".into()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn same_start_and_target_is_a_domain_error() {
        let model = sink_model();
        let states = enumerate_admissible_states(&model);
        let graph = generate_graph(&model, &states, crate::transitions::DEFAULT_SUBSET_CAP);
        let any = *graph.states.keys().next().unwrap();
        let err = find_path(&graph, any, any).unwrap_err();
        assert!(matches!(err, QrError::DomainError(_)));
    }

    #[test]
    fn finds_path_between_reachable_states() {
        let model = sink_model();
        let states = enumerate_admissible_states(&model);
        let graph = generate_graph(&model, &states, crate::transitions::DEFAULT_SUBSET_CAP);

        let start = crate::state::State::new(vec![
            (Landmark::Null, Derivative::Steady),
            (Landmark::Null, Derivative::Steady),
            (Landmark::Null, Derivative::Steady),
        ])
        .id();
        let target = crate::state::State::new(vec![
            (Landmark::Null, Derivative::Steady),
            (Landmark::Max, Derivative::Steady),
            (Landmark::Max, Derivative::Steady),
        ])
        .id();

        assert!(graph.states.contains_key(&start));
        assert!(graph.states.contains_key(&target));

        match find_path(&graph, start, target).unwrap() {
            PathOutcome::Found(predecessor) => {
                let path = reconstruct_path(&predecessor, start, target);
                assert_eq!(*path.first().unwrap(), start);
                assert_eq!(*path.last().unwrap(), target);
            }
            PathOutcome::NoPath => panic!("expected a path between the all-zero and full states"),
        }
    }

    #[test]
    fn unreachable_target_reports_no_path() {
        let model = sink_model();
        let states = enumerate_admissible_states(&model);
        let graph = generate_graph(&model, &states, crate::transitions::DEFAULT_SUBSET_CAP);

        let start = crate::state::State::new(vec![
            (Landmark::Null, Derivative::Steady),
            (Landmark::Null, Derivative::Steady),
            (Landmark::Null, Derivative::Steady),
        ])
        .id();
        let target = crate::state::State::new(vec![
            (Landmark::Pos, Derivative::Up),
            (Landmark::Max, Derivative::Down),
            (Landmark::Max, Derivative::Down),
        ])
        .id();

        assert!(graph.states.contains_key(&target), "target must itself be admissible for NoPath to be meaningful");
        let outcome = find_path(&graph, start, target).unwrap();
        assert_eq!(outcome, PathOutcome::NoPath);
    }
}

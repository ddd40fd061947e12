//! The admissibility predicate: decides whether a candidate state is
//! internally consistent with a model's landmark ranges, boundary rules,
//! value constraints, and relation sign-sets.
//!
//! This module is pure: it reads a [`Model`] and a [`State`] and returns a
//! bool. It never mutates either, and is safe to call from any thread.

use crate::model::{Model, RelationKind};
use crate::state::State;
use crate::value::{Derivative, Landmark};

/// Returns true iff every quantity in `state` satisfies all four
/// admissibility rules against `model`.
pub fn is_admissible(model: &Model, state: &State) -> bool {
    debug_assert_eq!(model.len(), state.len());

    for i in 0..model.len() {
        let quantity = &model.quantities[i];
        let magnitude = state.magnitude(i);
        let derivative = state.derivative(i);

        // 1. Landmark membership.
        if !quantity.possible_magnitudes.contains(&magnitude) {
            return false;
        }
        if !quantity.possible_derivatives.contains(&derivative) {
            return false;
        }

        // 2. Landmark-boundary/derivative consistency, checked positionally
        // against the quantity's own derivative ordering.
        let zero_index = zero_derivative_index(&quantity.possible_derivatives);
        let derivative_index = quantity
            .possible_derivatives
            .iter()
            .position(|d| *d == derivative)
            .expect("checked above: derivative is a member");
        let magnitude_index = quantity
            .possible_magnitudes
            .iter()
            .position(|m| *m == magnitude)
            .expect("checked above: magnitude is a member");

        if magnitude == Landmark::Max && derivative_index > zero_index {
            return false;
        }
        if magnitude_index == quantity.min_magnitude_index() && derivative_index < zero_index {
            return false;
        }

        // 3. Value constraints: every VC relation touching this quantity
        // requires its magnitude to equal the magnitude at the other end.
        for relation in model.value_constraints() {
            let other = if relation.from == i {
                Some(relation.to)
            } else if relation.to == i {
                Some(relation.from)
            } else {
                None
            };
            if let Some(other) = other {
                if magnitude != state.magnitude(other) {
                    return false;
                }
            }
        }

        // 4. Relation/derivative consistency over incoming influences and
        // proportionals.
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

        // "len(signs) == 1" in the source means the distinct sign set is
        // exactly {0}; expressed here as "zero seen and nothing else was".
        if saw_negative && saw_positive {
            // Ambiguous: any derivative admissible for this quantity.
            continue;
        } else if saw_negative && derivative != Derivative::Down {
            return false;
        } else if saw_positive && derivative != Derivative::Up {
            return false;
        } else if saw_zero && !saw_negative && !saw_positive && derivative != Derivative::Steady {
            return false;
        }
    }

    true
}

/// The index of the "nothing changing" derivative within `possible`,
/// identified positionally: the index of code `0` if present, otherwise
/// the middle index as an approximation.
fn zero_derivative_index(possible: &[Derivative]) -> usize {
    possible
        .iter()
        .position(|d| d.code() == 0)
        .unwrap_or(possible.len() / 2)
}

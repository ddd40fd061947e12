//! State enumeration: cartesian-product-plus-filter over the union of
//! every possible magnitude and derivative code across all quantities.
//!
//! Mirrors the source's `set()` of raw landmark/derivative values shared
//! across every position of the 2N-tuple, rather than a per-quantity
//! product — a slot's candidate value is only ever turned into a `State`
//! when it parses as a landmark (even slots) or a derivative (odd slots);
//! [`crate::admissibility::is_admissible`] rejects everything else,
//! including values that parse but don't belong to that quantity.

use crate::admissibility::is_admissible;
use crate::model::Model;
use crate::state::State;
use crate::value::{Derivative, Landmark};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Enumerate every admissible state of `model`.
///
/// For a model with zero quantities this returns the single empty-tuple
/// state. Otherwise builds the union of all landmark/derivative codes
/// used anywhere in the model, forms the `codes^(2N)` candidate space, and
/// keeps the candidates that pass the admissibility filter. The filter
/// runs over independent candidates, so the sweep is parallelised with
/// rayon; the result is order-independent (callers that need a stable
/// order should sort on [`State::id`]).
pub fn enumerate_admissible_states(model: &Model) -> Vec<State> {
    if model.is_empty() {
        return vec![State::new(vec![])];
    }

    let codes = universal_codes(model);
    let slots = model.len() * 2;
    let radix = codes.len() as u64;
    let total = radix.checked_pow(slots as u32).unwrap_or(u64::MAX);

    (0..total)
        .into_par_iter()
        .filter_map(|mut index| {
            let mut values = Vec::with_capacity(model.len());
            for q in 0..model.len() {
                let magnitude_digit = codes[(index % radix) as usize];
                index /= radix;
                let derivative_digit = codes[(index % radix) as usize];
                index /= radix;

                let magnitude = Landmark::from_code(magnitude_digit)?;
                let derivative = Derivative::from_code(derivative_digit)?;
                values.push((magnitude, derivative));
            }
            let state = State::new(values);
            is_admissible(model, &state).then_some(state)
        })
        .collect()
}

/// Every distinct landmark/derivative code used anywhere in the model, in
/// ascending order.
fn universal_codes(model: &Model) -> Vec<i8> {
    let mut set: BTreeSet<i8> = BTreeSet::new();
    for quantity in &model.quantities {
        set.extend(quantity.possible_magnitudes.iter().map(|m| m.code()));
        set.extend(quantity.possible_derivatives.iter().map(|d| d.code()));
    }
    set.into_iter().collect()
}

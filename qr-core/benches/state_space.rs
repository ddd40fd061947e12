//! Benchmarks for state enumeration and transition generation.
//!
//! Tests the performance of the engine's two most expensive stages:
//! - Cartesian-product-plus-filter state enumeration
//! - Fixed-point transition generation
//!
//! Both scale with the number of quantities in the model; the benchmark
//! sweeps quantity count to show where the cartesian-product approach
//! stops being tractable (see the enumerator's module docs).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qr_core::enumerator::enumerate_admissible_states;
use qr_core::model::RelationKind;
use qr_core::transitions::{generate_graph, DEFAULT_SUBSET_CAP};
use qr_core::{Derivative, Landmark, Model, Sign};

/// A chain of `n` quantities, each influencing the next, each ranging
/// over the full landmark set.
fn chain_model(n: usize) -> Model {
    let quantity_specs = (0..n)
        .map(|i| (format!("q{i}"), Landmark::ALL.to_vec(), Derivative::ALL.to_vec(), i == 0))
        .collect();
    let relation_specs = (0..n.saturating_sub(1))
        .map(|i| (RelationKind::Influence, Sign::Positive, format!("q{i}"), format!("q{}", i + 1)))
        .collect();
    Model::build(vec![], vec![], quantity_specs, relation_specs).unwrap()
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_space/enumeration");

    for n in [1usize, 2, 3, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let model = chain_model(n);
            b.iter(|| black_box(enumerate_admissible_states(&model)));
        });
    }

    group.finish();
}

fn bench_transition_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_space/transition_generation");

    for n in [1usize, 2, 3].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let model = chain_model(n);
            let states = enumerate_admissible_states(&model);
            b.iter(|| black_box(generate_graph(&model, &states, DEFAULT_SUBSET_CAP)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_enumeration, bench_transition_generation);
criterion_main!(benches);

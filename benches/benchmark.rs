use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use forkcast::restaurant::SourceDigest;
use forkcast::{build_vectors, filter, recommend, top_n_by_rating, Dataset, Restaurant};
use rand::prelude::*;
use std::collections::HashSet;

const SEED: u64 = 42;
const CUISINES: &[&str] = &[
    "North Indian", "Chinese", "Italian", "Thai", "Mughlai", "Fast Food", "Cafe", "Desserts",
    "South Indian", "Continental", "Bakery", "Street Food", "Pizza", "Burger", "Seafood",
];
const CITIES: &[&str] = &["New Delhi", "Gurgaon", "Noida", "Mumbai", "Bangalore"];

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(10))
        .warm_up_time(std::time::Duration::from_secs(2))
        .configure_from_args()
}

fn synthetic_dataset(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(SEED);
    let records = (0..rows)
        .map(|i| {
            let cuisines: Vec<&str> = CUISINES.choose_multiple(&mut rng, 3).copied().collect();
            let flag = |rng: &mut StdRng| if rng.gen_bool(0.3) { "Yes" } else { "No" };
            Restaurant {
                name: format!("Restaurant {}", i),
                cuisines: cuisines.join(", "),
                average_cost_for_two: Some((rng.gen_range(2..60) * 50) as f64),
                aggregate_rating: (rng.gen_range(0..=50) as f64) / 10.0,
                has_online_delivery: flag(&mut rng).to_string(),
                has_table_booking: flag(&mut rng).to_string(),
                city: CITIES[rng.gen_range(0..CITIES.len())].to_string(),
                ..Restaurant::default()
            }
        })
        .collect();
    Dataset::new(SourceDigest::from_bytes(b"benchmark"), records)
}

fn vectorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_vectors");
    for rows in [1_000usize, 5_000, 10_000] {
        let dataset = synthetic_dataset(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| build_vectors(black_box(dataset)).expect("vectors"))
        });
    }
    group.finish();
}

fn rank(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);
    let space = build_vectors(&dataset).expect("vectors");

    c.bench_function("recommend_top_10_of_10000", |b| {
        b.iter(|| recommend(&dataset, &space, black_box("Restaurant 4242"), 10).expect("recommend"))
    });

    c.bench_function("top_n_by_rating_of_10000", |b| {
        b.iter(|| top_n_by_rating(black_box(&dataset), 10))
    });
}

fn filter_then_rank(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);
    let cities: HashSet<String> = ["New Delhi".to_string()].into_iter().collect();

    c.bench_function("filter_vectorize_recommend", |b| {
        b.iter(|| {
            let subset = filter(&dataset, &cities, true, true);
            let anchor = subset.get(0).map(|r| r.name.clone()).unwrap_or_default();
            let space = build_vectors(&subset).expect("vectors");
            recommend(&subset, &space, &anchor, 5).expect("recommend")
        })
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = vectorize, rank, filter_then_rank
}
criterion_main!(benches);

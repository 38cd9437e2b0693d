//! Rule chain benchmarks
//!
//! Measures duplicate detection over growing collections and the cost of
//! continuous-mode chains that record failures.
//!
//! Run with: cargo bench --package rulechain-bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rulechain::prelude::*;

struct Line {
    code: String,
    region: Option<String>,
}

fn create_lines(count: usize) -> Vec<Line> {
    (0..count)
        .map(|i| Line {
            // every tenth line repeats an earlier code
            code: format!("SKU-{}", if i % 10 == 9 { i - 1 } else { i }),
            region: (i % 2 == 0).then(|| "EU".to_string()),
        })
        .collect()
}

fn bench_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("must_not_have_duplicates");

    for size in [10, 100, 1_000] {
        let lines = create_lines(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let mut chain = RuleChain::new("bench");
                let _ = chain
                    .bind(black_box(lines))
                    .field("lines")
                    .continuous()
                    .must_not_have_duplicates(&["code", "region"], |l| {
                        CompositeKey::new().part(&l.code).part(&l.region)
                    });
                chain.errors().len()
            })
        });
    }

    group.finish();
}

fn bench_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    group.bench_function("immediate_passing", |b| {
        b.iter(|| {
            let mut chain = RuleChain::new("bench");
            chain
                .bind(black_box("12345"))
                .field("zip")
                .required()
                .and_then(|b| b.must_be_numeric())
                .and_then(|b| b.must_have_exact_length(5))
                .map(|_| ())
        })
    });

    group.bench_function("continuous_failing", |b| {
        b.iter(|| {
            let mut chain = RuleChain::new("bench");
            for i in 0..10 {
                let _ = chain
                    .bind(black_box("abc"))
                    .field_indexed("lines[{0}].zip", i)
                    .continuous()
                    .must_be_numeric()
                    .and_then(|b| b.must_have_exact_length(5))
                    .and_then(|b| b.must_match_regex(r"\d{5}"));
            }
            chain.finalize().is_err()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_duplicates, bench_chains);
criterion_main!(benches);

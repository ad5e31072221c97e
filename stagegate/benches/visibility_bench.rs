//! Benchmarks for visibility resolution and dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stagegate::config::FormConfig;
use stagegate::core::FormInput;
use stagegate::events::NoOpEventSink;
use stagegate::session::{CompletionSet, FormSession, VisibilityResolver};
use stagegate::signup::{ids, signup_session};
use stagegate::testing::linear_registry;
use std::sync::Arc;

fn visibility_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_indices");
    for len in [10usize, 100, 1000] {
        let registry = linear_registry(len);
        let completion: CompletionSet = (0..len / 2).map(|i| format!("s{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| {
                let resolver = VisibilityResolver::new(&registry, &completion);
                black_box(resolver.visible_indices())
            });
        });
    }
    group.finish();
}

fn dispatch_benchmark(c: &mut Criterion) {
    let config = FormConfig::default().with_palette_seed(7);
    c.bench_function("signup_walkthrough", |b| {
        b.iter(|| {
            let mut session: FormSession =
                signup_session(&config, Arc::new(NoOpEventSink)).expect("valid registry");
            for input in [
                FormInput::text(ids::USERNAME, "alice"),
                FormInput::text(ids::EMAIL, "alice@example.com"),
                FormInput::text(ids::PASSWORD, "hunter2"),
            ] {
                black_box(session.dispatch(input).expect("visible stage"));
            }
            black_box(session.view())
        });
    });
}

criterion_group!(benches, visibility_benchmark, dispatch_benchmark);
criterion_main!(benches);

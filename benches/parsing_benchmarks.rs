use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kube_rollout_watch::parsing::IdentityExtractor;
use kube_rollout_watch::readiness::is_ready;
use kube_rollout_watch::types::ConditionSnapshot;

fn identity_benchmark(c: &mut Criterion) {
    let extractor = IdentityExtractor::new("gitlab.example.com").unwrap();
    let test_values = vec![
        "git@gitlab.example.com:team/repo.git",
        "git@gitlab.example.com/platform/charts.git",
        "git@github.com:team/repo.git",
        "team/repo",
        "",
    ];

    c.bench_function("identity", |b| {
        b.iter(|| {
            for value in &test_values {
                black_box(extractor.identity(black_box(value)));
            }
        })
    });
}

fn readiness_benchmark(c: &mut Criterion) {
    let conditions = vec![
        ConditionSnapshot::new("PodScheduled", "True"),
        ConditionSnapshot::new("Initialized", "True"),
        ConditionSnapshot::new("Ready", "False"),
        ConditionSnapshot::new("ContainersReady", "True"),
    ];

    c.bench_function("is_ready", |b| {
        b.iter(|| black_box(is_ready(black_box(&conditions))))
    });
}

criterion_group!(benches, identity_benchmark, readiness_benchmark);
criterion_main!(benches);

//! Performance benchmarks for phase execution
//!
//! Run with: cargo bench --bench hook_benchmarks

use chrono::{DateTime, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lifecycle_hooks::hooks::{CallScope, HookRegistry, hook_fn};
use lifecycle_hooks::{impl_auditable, impl_soft_deletable};

#[derive(Debug, Default, Clone)]
struct BenchEntity {
    counter: u64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    created_by: Option<String>,
    updated_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

impl_auditable!(BenchEntity {
    created_at,
    updated_at,
    created_by,
    updated_by
});
impl_soft_deletable!(BenchEntity, deleted_at);

fn registry_with(count: usize) -> HookRegistry<BenchEntity> {
    let mut registry = HookRegistry::new();
    for _ in 0..count {
        registry.register_before_save(hook_fn(
            "increment",
            |_scope: &CallScope, entity: &mut BenchEntity| {
                entity.counter += 1;
                Ok(())
            },
        ));
    }
    registry
}

fn bench_hook_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("hook_execution");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for count in [0usize, 1, 5, 10] {
        let registry = registry_with(count);
        let scope = CallScope::new();

        group.bench_with_input(BenchmarkId::new("before_create", count), &count, |b, _| {
            b.to_async(&rt).iter(|| async {
                let mut entity = BenchEntity::default();
                registry
                    .execute_before_create(&scope, &mut entity)
                    .await
                    .ok();
                black_box(entity.counter);
            });
        });
    }

    group.finish();
}

fn bench_builtin_hooks(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_hooks");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut registry = HookRegistry::<BenchEntity>::new();
    registry.with_audit().with_soft_delete();
    let scope = CallScope::new().with_actor("bench");

    group.bench_function("audit_create", |b| {
        b.to_async(&rt).iter(|| async {
            let mut entity = BenchEntity::default();
            registry
                .execute_before_create(&scope, &mut entity)
                .await
                .ok();
            black_box(entity.updated_at);
        });
    });

    group.bench_function("soft_delete", |b| {
        b.to_async(&rt).iter(|| async {
            let mut entity = BenchEntity::default();
            registry
                .execute_before_delete(&scope, &mut entity)
                .await
                .ok();
            black_box(entity.deleted_at);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hook_execution, bench_builtin_hooks);
criterion_main!(benches);

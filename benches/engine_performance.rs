//! Performance benchmarks for the metrics engine
//!
//! Covers the components recomputed on every dashboard refresh: pivot
//! construction, insight detection, period comparison and the comparison
//! batch through the service.

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use metric_lens::config::EngineSettings;
use metric_lens::domain::metrics::{
    demo_data::GenerationMode, insight, summarize, ComparisonRecord, DateRange, Granularity,
    InsightConfig, ModuleId, ObservationSet, PivotTable,
};
use metric_lens::infrastructure::{DataSource, MockDataSource};
use metric_lens::DashboardService;
use std::hint::black_box;
use std::sync::Arc;

fn range(days: u64) -> DateRange {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let end = start
        .checked_add_days(chrono::Days::new(days - 1))
        .expect("date in range");
    DateRange::try_new(start, end).expect("ordered range")
}

fn module() -> ModuleId {
    ModuleId::try_new("ai_diagnosis".to_string()).expect("catalog module")
}

fn observations(runtime: &tokio::runtime::Runtime, days: u64) -> ObservationSet {
    let source = MockDataSource::new(GenerationMode::Random, false, Some(17));
    runtime
        .block_on(source.fetch_metrics(&module(), &range(days), Granularity::Day))
        .expect("catalog module")
}

fn bench_engine_components(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("engine_components");

    for days in [30u64, 90, 365] {
        let set = observations(&runtime, days);

        group.bench_function(format!("pivot_{days}d"), |b| {
            b.iter(|| black_box(PivotTable::build(black_box(&set))));
        });

        group.bench_function(format!("summaries_{days}d"), |b| {
            b.iter(|| black_box(summarize(black_box(&set))));
        });

        group.bench_function(format!("insights_{days}d"), |b| {
            let config = InsightConfig::default();
            b.iter(|| black_box(insight::insights_for(black_box(&set), &config)));
        });

        group.bench_function(format!("comparison_{days}d"), |b| {
            let names = set.metric_names();
            b.iter(|| {
                for name in &names {
                    black_box(ComparisonRecord::from_sets(name, &set, &set));
                }
            });
        });
    }

    group.finish();
}

fn bench_comparison_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let current_range = range(30);
    let current = observations(&runtime, 30);
    let service = DashboardService::with_seed(
        Arc::new(MockDataSource::deterministic()),
        EngineSettings::default(),
        0,
    );

    c.bench_function("comparison_batch_30d", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(
                service
                    .compare_periods(&module(), &current_range, Granularity::Day, &current)
                    .await
                    .expect("mock source"),
            )
        });
    });
}

criterion_group!(benches, bench_engine_components, bench_comparison_batch);
criterion_main!(benches);

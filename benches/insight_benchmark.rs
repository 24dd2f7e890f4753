use criterion::{black_box, criterion_group, criterion_main, Criterion};
use insightrs::ml::anomaly_detection::detect_anomalies;
use insightrs::report::generate_report;
use insightrs::{classify_fields, missing_census, range_outliers, Column, DataFrame, Float64Column, StringColumn};

fn build_frame(rows: usize) -> DataFrame {
    let mut df = DataFrame::new();

    let x: Vec<f64> = (0..rows).map(|i| (i % 97) as f64 * 1.3).collect();
    let y: Vec<f64> = (0..rows).map(|i| (i % 89) as f64 * 0.7 + 5.0).collect();
    let z: Vec<f64> = (0..rows).map(|i| ((i * 31) % 101) as f64).collect();
    let label: Vec<String> = (0..rows).map(|i| format!("c{}", i % 5)).collect();

    df.add_column("x", Column::Float64(Float64Column::new(x)))
        .unwrap();
    df.add_column("y", Column::Float64(Float64Column::new(y)))
        .unwrap();
    df.add_column("z", Column::Float64(Float64Column::new(z)))
        .unwrap();
    df.add_column("label", Column::String(StringColumn::new(label)))
        .unwrap();
    df
}

fn bench_profiling(c: &mut Criterion) {
    let df = build_frame(10_000);
    let classes = classify_fields(&df);

    c.bench_function("classify_fields 10k rows", |b| {
        b.iter(|| classify_fields(black_box(&df)))
    });

    c.bench_function("missing_census 10k rows", |b| {
        b.iter(|| missing_census(black_box(&df)))
    });

    c.bench_function("range_outliers 10k rows", |b| {
        b.iter(|| range_outliers(black_box(&df), black_box(&classes.numeric)).unwrap())
    });
}

fn bench_anomaly_detection(c: &mut Criterion) {
    let df = build_frame(2_000);
    let classes = classify_fields(&df);

    c.bench_function("isolation_forest 2k rows", |b| {
        b.iter(|| detect_anomalies(black_box(&df), black_box(&classes.numeric), 0.05).unwrap())
    });
}

fn bench_report(c: &mut Criterion) {
    let df = build_frame(2_000);

    c.bench_function("generate_report 2k rows", |b| {
        b.iter(|| generate_report(black_box(&df)).unwrap())
    });
}

criterion_group!(benches, bench_profiling, bench_anomaly_detection, bench_report);
criterion_main!(benches);

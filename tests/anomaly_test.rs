use insightrs::ml::anomaly_detection::{detect_anomalies, detect_anomalies_seeded};
use insightrs::ml::pipeline::{Pipeline, Transformer};
use insightrs::{Column, DataFrame, Float64Column, Int64Column, IsolationForest};

// 決定的な疑似乱数パターンでテストデータを準備するヘルパー関数
fn synthetic_df(n: usize) -> DataFrame {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        // 線形合同法による再現可能な値の生成
        let a = ((i as u64).wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407) >> 33)
            as f64
            / 4.0e9;
        let b = ((i as u64).wrapping_mul(2862933555777941757).wrapping_add(3037000493) >> 33)
            as f64
            / 4.0e9;
        x.push(50.0 + a * 10.0);
        y.push(100.0 + b * 20.0);
    }

    let mut df = DataFrame::new();
    df.add_column("x", Column::Float64(Float64Column::new(x)))
        .unwrap();
    df.add_column("y", Column::Float64(Float64Column::new(y)))
        .unwrap();
    df
}

fn numeric_names() -> Vec<String> {
    vec!["x".to_string(), "y".to_string()]
}

#[test]
fn test_detect_anomalies_contamination_band() {
    let df = synthetic_df(1000);
    let result = detect_anomalies(&df, &numeric_names(), 0.05).unwrap();

    // 汚染率5%なら1000行中およそ50行が異常と判定される
    assert!(
        result.flagged_count >= 40 && result.flagged_count <= 75,
        "flagged_count = {}",
        result.flagged_count
    );
    assert_eq!(result.flagged.row_count(), result.flagged_count);
    assert_eq!(result.scores.len(), 1000);
    assert_eq!(result.labels.len(), 1000);
}

#[test]
fn test_detect_anomalies_is_deterministic_with_seed() {
    let df = synthetic_df(200);

    let first = detect_anomalies_seeded(&df, &numeric_names(), 0.05, Some(7)).unwrap();
    let second = detect_anomalies_seeded(&df, &numeric_names(), 0.05, Some(7)).unwrap();

    assert_eq!(first.labels, second.labels);
    assert_eq!(first.scores, second.scores);
    assert!((first.threshold - second.threshold).abs() < 1e-15);
}

#[test]
fn test_detect_anomalies_flags_planted_outlier() {
    let mut df = synthetic_df(300);
    // 正常クラスタから大きく離れた行を追加したDataFrameを作る
    let mut x: Vec<f64> = df.numeric_observed("x").unwrap();
    let mut y: Vec<f64> = df.numeric_observed("y").unwrap();
    x.push(10_000.0);
    y.push(-5_000.0);

    df = DataFrame::new();
    df.add_column("x", Column::Float64(Float64Column::new(x)))
        .unwrap();
    df.add_column("y", Column::Float64(Float64Column::new(y)))
        .unwrap();

    let result = detect_anomalies(&df, &numeric_names(), 0.05).unwrap();
    // 植え付けた外れ値（最終行）は必ず異常になる
    assert_eq!(result.labels[300], 1);
}

#[test]
fn test_detect_anomalies_requires_two_numeric_columns() {
    let mut df = DataFrame::new();
    df.add_column(
        "only",
        Column::Float64(Float64Column::new((0..100).map(|i| i as f64).collect())),
    )
    .unwrap();

    let result = detect_anomalies(&df, &["only".to_string()], 0.05);
    assert!(result.is_err());
}

#[test]
fn test_detect_anomalies_requires_minimum_rows() {
    let mut df = DataFrame::new();
    df.add_column("x", Column::Int64(Int64Column::new(vec![1, 2, 3])))
        .unwrap();
    df.add_column("y", Column::Int64(Int64Column::new(vec![4, 5, 6])))
        .unwrap();

    let result = detect_anomalies(&df, &numeric_names(), 0.05);
    assert!(result.is_err());
}

#[test]
fn test_detect_anomalies_does_not_mutate_input() {
    let df = synthetic_df(100);
    let result = detect_anomalies(&df, &numeric_names(), 0.05).unwrap();

    // 入力は変更されず、拡張列は新しいDataFrameにだけ追加される
    assert_eq!(df.column_count(), 2);
    assert_eq!(result.augmented.column_count(), 4);
    assert!(result.augmented.contains_column("anomaly_score"));
    assert!(result.augmented.contains_column("anomaly"));
    assert_eq!(result.augmented.row_count(), df.row_count());
}

#[test]
fn test_isolation_forest_invalid_contamination() {
    assert!(IsolationForest::new(100, None, 0.0, Some(42)).is_err());
    assert!(IsolationForest::new(100, None, 0.5, Some(42)).is_err());
    assert!(IsolationForest::new(100, None, 0.1, Some(42)).is_ok());
}

#[test]
fn test_isolation_forest_in_pipeline() {
    let df = synthetic_df(100);

    let mut pipeline = Pipeline::new();
    pipeline.add_transformer(IsolationForest::default());
    let transformed = pipeline.fit_transform(&df).unwrap();

    assert!(transformed.contains_column("anomaly_score"));
    assert!(transformed.contains_column("anomaly"));
    assert_eq!(transformed.row_count(), 100);
}

#[test]
fn test_isolation_forest_imputes_missing_values() {
    let mut df = DataFrame::new();
    let n = 50;
    let mut values = Vec::with_capacity(n);
    let mut nulls = Vec::with_capacity(n);
    for i in 0..n {
        values.push(i as f64);
        nulls.push(i % 10 == 0);
    }
    df.add_column("x", Column::Float64(Float64Column::with_nulls(values, nulls)))
        .unwrap();
    df.add_column(
        "y",
        Column::Float64(Float64Column::new((0..n).map(|i| (i as f64) * 2.0).collect())),
    )
    .unwrap();

    // NULLは列平均で補完されるため、学習は成功する
    let result = detect_anomalies(&df, &numeric_names(), 0.1).unwrap();
    assert_eq!(result.scores.len(), n);
}

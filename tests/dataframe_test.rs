use insightrs::{BooleanColumn, Column, DataFrame, Float64Column, Int64Column, StringColumn};

#[test]
fn test_dataframe_creation() {
    // 空のDataFrameを作成
    let df = DataFrame::new();
    assert_eq!(df.column_count(), 0);
    assert_eq!(df.row_count(), 0);
    assert!(df.column_names().is_empty());
}

#[test]
fn test_dataframe_add_column() {
    let mut df = DataFrame::new();
    let values = Int64Column::new(vec![10, 20, 30]);

    df.add_column("values", Column::Int64(values)).unwrap();

    assert_eq!(df.column_count(), 1);
    assert_eq!(df.row_count(), 3);
    assert_eq!(df.column_names(), &["values"]);
    assert!(df.contains_column("values"));
    assert!(!df.contains_column("missing"));
}

#[test]
fn test_dataframe_duplicate_column_name() {
    let mut df = DataFrame::new();
    df.add_column("a", Column::Int64(Int64Column::new(vec![1, 2])))
        .unwrap();

    // 同じ列名は追加できない
    let result = df.add_column("a", Column::Int64(Int64Column::new(vec![3, 4])));
    assert!(result.is_err());
}

#[test]
fn test_dataframe_column_length_mismatch() {
    let mut df = DataFrame::new();
    df.add_column("age", Column::Int64(Int64Column::new(vec![25, 30, 35])))
        .unwrap();

    // 長さの異なる列を追加するとエラーになる
    let heights = Int64Column::new(vec![170, 180]);
    let result = df.add_column("height", Column::Int64(heights));
    assert!(result.is_err());
}

#[test]
fn test_dataframe_null_count() {
    let mut df = DataFrame::new();
    df.add_column(
        "score",
        Column::Float64(Float64Column::with_nulls(
            vec![1.0, 0.0, 3.0],
            vec![false, true, false],
        )),
    )
    .unwrap();
    df.add_column(
        "label",
        Column::String(StringColumn::new(vec![
            "a".to_string(),
            "".to_string(),
            "c".to_string(),
        ])),
    )
    .unwrap();

    assert_eq!(df.null_count("score").unwrap(), 1);
    // 空文字列はNULLではない
    assert_eq!(df.null_count("label").unwrap(), 0);
}

#[test]
fn test_dataframe_filter_by_mask() {
    let mut df = DataFrame::new();
    df.add_column("x", Column::Int64(Int64Column::new(vec![1, 2, 3, 4])))
        .unwrap();
    df.add_column(
        "flag",
        Column::Boolean(BooleanColumn::new(vec![true, false, true, false])),
    )
    .unwrap();

    let filtered = df.filter_by_mask(&[true, false, true, false]).unwrap();
    assert_eq!(filtered.row_count(), 2);
    assert_eq!(filtered.column_count(), 2);

    let view = filtered.column("x").unwrap();
    let col = view.as_int64().unwrap();
    assert_eq!(col.get(0).unwrap(), Some(1));
    assert_eq!(col.get(1).unwrap(), Some(3));

    // 元のDataFrameは変更されない
    assert_eq!(df.row_count(), 4);
}

#[test]
fn test_dataframe_filter_by_mask_wrong_length() {
    let mut df = DataFrame::new();
    df.add_column("x", Column::Int64(Int64Column::new(vec![1, 2, 3])))
        .unwrap();

    let result = df.filter_by_mask(&[true, false]);
    assert!(result.is_err());
}

#[test]
fn test_dataframe_head() {
    let mut df = DataFrame::new();
    df.add_column("x", Column::Int64(Int64Column::new((0..100).collect())))
        .unwrap();

    let head = df.head(5).unwrap();
    assert_eq!(head.row_count(), 5);

    // 行数より大きいnを指定しても全行が返るだけ
    let all = df.head(1000).unwrap();
    assert_eq!(all.row_count(), 100);
}

#[test]
fn test_dataframe_numeric_extraction() {
    let mut df = DataFrame::new();
    df.add_column(
        "x",
        Column::Int64(Int64Column::with_nulls(vec![1, 0, 3], vec![false, true, false])),
    )
    .unwrap();
    df.add_column(
        "label",
        Column::String(StringColumn::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ])),
    )
    .unwrap();

    let observed = df.numeric_observed("x").unwrap();
    assert_eq!(observed, vec![1.0, 3.0]);

    let options = df.numeric_options("x").unwrap();
    assert_eq!(options, vec![Some(1.0), None, Some(3.0)]);

    // 文字列列は数値として取り出せない
    assert!(df.numeric_observed("label").is_err());
}

#[test]
fn test_dataframe_ensure_analyzable() {
    // 列がないテーブル
    let df = DataFrame::new();
    assert!(df.ensure_analyzable().is_err());

    // 列はあるが行がないテーブル
    let mut empty_rows = DataFrame::new();
    empty_rows
        .add_column("x", Column::Int64(Int64Column::new(vec![])))
        .unwrap();
    assert!(empty_rows.ensure_analyzable().is_err());

    // 分析可能なテーブル
    let mut ok = DataFrame::new();
    ok.add_column("x", Column::Int64(Int64Column::new(vec![1])))
        .unwrap();
    assert!(ok.ensure_analyzable().is_ok());
}

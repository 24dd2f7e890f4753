use insightrs::{ColumnType, DataFrame};

#[test]
fn test_from_csv_str_type_inference() {
    let csv = "age,height,active,name\n25,170.5,true,Alice\n30,180.0,false,Bob\n35,175.2,yes,Charlie\n";
    let df = DataFrame::from_csv_str(csv, true).unwrap();

    assert_eq!(df.row_count(), 3);
    assert_eq!(df.column_count(), 4);
    assert_eq!(df.column_type("age").unwrap(), ColumnType::Int64);
    assert_eq!(df.column_type("height").unwrap(), ColumnType::Float64);
    assert_eq!(df.column_type("active").unwrap(), ColumnType::Boolean);
    assert_eq!(df.column_type("name").unwrap(), ColumnType::String);
}

#[test]
fn test_from_csv_str_empty_fields_become_nulls() {
    let csv = "age,city\n25,tokyo\n,osaka\n30,\n";
    let df = DataFrame::from_csv_str(csv, true).unwrap();

    // 数値列の空フィールドはNULLになる
    assert_eq!(df.column_type("age").unwrap(), ColumnType::Int64);
    assert_eq!(df.null_count("age").unwrap(), 1);

    // 文字列列の空フィールドは空文字列のまま（NULLではない）
    assert_eq!(df.column_type("city").unwrap(), ColumnType::String);
    assert_eq!(df.null_count("city").unwrap(), 0);
}

#[test]
fn test_from_csv_str_mixed_tokens_are_categorical() {
    // 1つでも数値でないトークンがあれば文字列列になる
    let csv = "code\n100\n200\nN/A\n";
    let df = DataFrame::from_csv_str(csv, true).unwrap();

    assert_eq!(df.column_type("code").unwrap(), ColumnType::String);
}

#[test]
fn test_from_csv_str_without_header() {
    let csv = "1,a\n2,b\n";
    let df = DataFrame::from_csv_str(csv, false).unwrap();

    assert_eq!(df.column_names(), &["column_0", "column_1"]);
    assert_eq!(df.row_count(), 2);
}

#[test]
fn test_csv_file_roundtrip() {
    let csv = "x,y\n1,2.5\n2,3.5\n3,\n";
    let df = DataFrame::from_csv_str(csv, true).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.csv");
    df.to_csv(&path, true).unwrap();

    let reloaded = DataFrame::from_csv(&path, true).unwrap();
    assert_eq!(reloaded.row_count(), df.row_count());
    assert_eq!(reloaded.column_names(), df.column_names());
    assert_eq!(reloaded.column_type("x").unwrap(), ColumnType::Int64);
    assert_eq!(reloaded.column_type("y").unwrap(), ColumnType::Float64);
    // NULLは空フィールドとして書き出され、読み戻してもNULLになる
    assert_eq!(reloaded.null_count("y").unwrap(), 1);
}

#[test]
fn test_to_json_records() {
    let csv = "x,name\n1,alice\n,bob\n";
    let df = DataFrame::from_csv_str(csv, true).unwrap();

    let json = df.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["x"], 1);
    assert_eq!(records[0]["name"], "alice");
    // NULLはJSONのnullになる
    assert!(records[1]["x"].is_null());
}

// データプロファイリングモジュール
//
// フィールド分類（数値列とカテゴリ列の分割）、欠損値の集計、
// 四分位範囲（IQR）による外れ値検出を提供します。

use serde::Serialize;

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::stats::descriptive;

/// フィールド分類の結果
///
/// 全列名を数値列とカテゴリ列に分割したもの。両方とも元の列順を
/// 保持し、和集合は全列、積集合は空になります。どちらかが空になる
/// こともあります。
#[derive(Debug, Clone, Serialize)]
pub struct FieldClassification {
    /// 数値列（Int64, Float64）
    pub numeric: Vec<String>,
    /// カテゴリ列（String, Boolean）
    pub categorical: Vec<String>,
}

/// 列を数値列とカテゴリ列に分類する
///
/// 分類は値の型だけで決まります。Int64とFloat64は数値列、
/// 文字列とブールはカテゴリ列です。
pub fn classify_fields(df: &DataFrame) -> FieldClassification {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();

    for name in df.column_names() {
        // add_column済みの列名なのでcolumn_typeは失敗しない
        match df.column_type(name) {
            Ok(col_type) if col_type.is_numeric() => numeric.push(name.clone()),
            _ => categorical.push(name.clone()),
        }
    }

    FieldClassification {
        numeric,
        categorical,
    }
}

/// 欠損値の集計
///
/// NULL値を1つ以上含む列の (列名, NULL数) を元の列順で返します。
/// NULL数が0の列は含まれません。文字列列の空文字列は欠損とは
/// みなしません。
pub fn missing_census(df: &DataFrame) -> Vec<(String, usize)> {
    df.column_names()
        .iter()
        .filter_map(|name| {
            let count = df.null_count(name).unwrap_or(0);
            if count > 0 {
                Some((name.clone(), count))
            } else {
                None
            }
        })
        .collect()
}

/// 四分位範囲による外れ値検出の結果（数値列ごと）
#[derive(Debug, Clone, Serialize)]
pub struct OutlierRecord {
    /// 下限 (Q1 - 1.5 * IQR)
    pub lower_bound: f64,
    /// 上限 (Q3 + 1.5 * IQR)
    pub upper_bound: f64,
    /// [lower, upper] の外側に出た行数
    pub outlier_count: usize,
    /// 判定に使用したNULL以外の値の数
    pub observed: usize,
}

/// 数値列ごとに四分位範囲ルールで外れ値を検出する
///
/// 境界は (Q1 - 1.5*IQR, Q3 + 1.5*IQR)、Q1/Q3は線形補間による
/// 25%/75%分位点です。境界の外側に「厳密に」出た値だけを数えます。
/// IQR=0（定数列）では境界がその定数に退化するため、定数と異なる
/// 値はすべて外れ値になります。これはルール通りの挙動です。
/// 全行NULLの列は外れ値0件、境界NaNとして報告されます。
pub fn range_outliers(
    df: &DataFrame,
    numeric_names: &[String],
) -> Result<Vec<(String, OutlierRecord)>> {
    df.ensure_analyzable()?;

    let mut records = Vec::with_capacity(numeric_names.len());

    for name in numeric_names {
        let observed = df.numeric_observed(name)?;

        if observed.is_empty() {
            records.push((
                name.clone(),
                OutlierRecord {
                    lower_bound: f64::NAN,
                    upper_bound: f64::NAN,
                    outlier_count: 0,
                    observed: 0,
                },
            ));
            continue;
        }

        let mut sorted = observed.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = descriptive::percentile(&sorted, 0.25);
        let q3 = descriptive::percentile(&sorted, 0.75);
        let iqr = q3 - q1;

        let lower_bound = q1 - 1.5 * iqr;
        let upper_bound = q3 + 1.5 * iqr;

        let outlier_count = observed
            .iter()
            .filter(|&&v| v < lower_bound || v > upper_bound)
            .count();

        records.push((
            name.clone(),
            OutlierRecord {
                lower_bound,
                upper_bound,
                outlier_count,
                observed: observed.len(),
            },
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, Float64Column, Int64Column, StringColumn};

    fn build_df() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "age",
            Column::Int64(Int64Column::new(vec![20, 22, 25, 24, 23, 999])),
        )
        .unwrap();
        df.add_column(
            "score",
            Column::Float64(Float64Column::with_nulls(
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 0.0],
                vec![false, false, false, false, false, true],
            )),
        )
        .unwrap();
        df.add_column(
            "city",
            Column::String(StringColumn::new(
                ["tokyo", "osaka", "tokyo", "kyoto", "", "osaka"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )),
        )
        .unwrap();
        df
    }

    #[test]
    fn test_classify_fields_partition() {
        let df = build_df();
        let classes = classify_fields(&df);

        assert_eq!(classes.numeric, vec!["age", "score"]);
        assert_eq!(classes.categorical, vec!["city"]);

        // 和集合 = 全列、積集合 = 空
        let total = classes.numeric.len() + classes.categorical.len();
        assert_eq!(total, df.column_count());
        for name in &classes.numeric {
            assert!(!classes.categorical.contains(name));
        }
    }

    #[test]
    fn test_missing_census_skips_complete_columns() {
        let df = build_df();
        let census = missing_census(&df);

        // scoreにのみNULLがある。空文字列("")は欠損ではない。
        assert_eq!(census, vec![("score".to_string(), 1)]);
    }

    #[test]
    fn test_range_outliers_flags_extreme_value() {
        let df = build_df();
        let records = range_outliers(&df, &["age".to_string()]).unwrap();

        let (name, record) = &records[0];
        assert_eq!(name, "age");
        assert_eq!(record.outlier_count, 1);
        assert!(record.lower_bound < 20.0);
        assert!(record.upper_bound < 999.0);
    }

    #[test]
    fn test_range_outliers_constant_column() {
        let mut df = DataFrame::new();
        df.add_column("flat", Column::Float64(Float64Column::new(vec![7.0; 10])))
            .unwrap();

        let records = range_outliers(&df, &["flat".to_string()]).unwrap();
        let record = &records[0].1;

        // IQR=0: 境界は定数に退化し、逸脱がなければ外れ値は0件
        assert_eq!(record.outlier_count, 0);
        assert!((record.lower_bound - 7.0).abs() < 1e-10);
        assert!((record.upper_bound - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_range_outliers_all_null_column() {
        let mut df = DataFrame::new();
        df.add_column(
            "empty",
            Column::Float64(Float64Column::with_nulls(vec![0.0; 4], vec![true; 4])),
        )
        .unwrap();

        let records = range_outliers(&df, &["empty".to_string()]).unwrap();
        let record = &records[0].1;

        assert_eq!(record.outlier_count, 0);
        assert_eq!(record.observed, 0);
        assert!(record.lower_bound.is_nan());
    }
}

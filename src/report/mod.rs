// レポート生成モジュール
//
// プロファイリング、外れ値検出、異常検出、記述統計の結果を1つの
// 決定的なテキストレポートに組み立てます。セクションは固定順で、
// 同じ入力と同じオプションからは常に同じテキストが生成されます。

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::ml::anomaly_detection::{self, DEFAULT_CONTAMINATION, DEFAULT_SEED};
use crate::profile::{self, FieldClassification};
use crate::stats;

/// レポート生成のオプション
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// 異常検出の汚染率（異常値の期待割合）
    pub contamination: f64,
    /// 異常検出の乱数シード（Noneで非決定的）
    pub random_seed: Option<u64>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            contamination: DEFAULT_CONTAMINATION,
            random_seed: Some(DEFAULT_SEED),
        }
    }
}

/// 既定のオプションでレポートを生成する
pub fn generate_report(df: &DataFrame) -> Result<String> {
    generate_report_with(df, &ReportOptions::default())
}

/// オプションを指定してレポートを生成する
///
/// 空のテーブルはエラーになります。各セクションは独立して計算される
/// ため、1つのセクションの失敗は他のセクションの出力を妨げません。
/// 失敗したセクションには理由を記したプレースホルダが入ります。
pub fn generate_report_with(df: &DataFrame, options: &ReportOptions) -> Result<String> {
    // 空のテーブルは致命的エラー: 部分的なレポートは生成しない
    df.ensure_analyzable()?;

    if options.contamination <= 0.0 || options.contamination >= 0.5 {
        return Err(Error::InvalidValue(format!(
            "汚染率は(0, 0.5)の範囲で指定してください: {}",
            options.contamination
        )));
    }

    log::debug!(
        "generating report: {} rows x {} columns",
        df.row_count(),
        df.column_count()
    );

    let classes = profile::classify_fields(df);

    let mut out = String::new();
    out.push_str("DATA INSIGHT REPORT\n");
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");

    push_section(&mut out, "[1] Dataset Overview", overview_section(df, &classes));
    push_section(&mut out, "[2] Missing Values", missing_section(df));
    push_section(
        &mut out,
        "[3] Range-Rule Outliers (IQR)",
        outlier_section(df, &classes),
    );
    push_section(
        &mut out,
        "[4] Multivariate Anomaly Scan (Isolation Forest)",
        anomaly_section(df, &classes, options),
    );
    push_section(
        &mut out,
        "[5] Descriptive Statistics",
        statistics_section(df, &classes),
    );
    push_section(
        &mut out,
        "[6] Correlation Matrix",
        correlation_section(df, &classes),
    );
    push_section(&mut out, "[7] Modeling Guidance", Ok(guidance_section(&classes)));
    push_section(&mut out, "[8] Recommendations", Ok(recommendations_section()));

    Ok(out)
}

/// セクションを追加する
///
/// セクション本体の計算が失敗した場合は、理由を記した
/// プレースホルダで置き換えます。
fn push_section(out: &mut String, title: &str, body: Result<String>) {
    out.push_str(title);
    out.push('\n');
    match body {
        Ok(text) => out.push_str(&text),
        Err(err) => out.push_str(&format!("!! Section unavailable: {}\n", err)),
    }
    out.push('\n');
}

fn overview_section(df: &DataFrame, classes: &FieldClassification) -> Result<String> {
    let mut body = String::new();
    body.push_str(&format!(
        "Shape: {} rows x {} columns\n",
        df.row_count(),
        df.column_count()
    ));
    body.push_str(&format!("Numeric fields: {:?}\n", classes.numeric));
    body.push_str(&format!("Categorical fields: {:?}\n", classes.categorical));
    Ok(body)
}

fn missing_section(df: &DataFrame) -> Result<String> {
    let census = profile::missing_census(df);
    if census.is_empty() {
        return Ok("None. The dataset is complete.\n".to_string());
    }

    let mut body = String::new();
    for (name, count) in census {
        body.push_str(&format!("{}: {}\n", name, count));
    }
    Ok(body)
}

fn outlier_section(df: &DataFrame, classes: &FieldClassification) -> Result<String> {
    if classes.numeric.is_empty() {
        return Ok("No numeric fields to scan.\n".to_string());
    }

    let records = profile::range_outliers(df, &classes.numeric)?;

    let mut body = String::new();
    for (name, record) in records {
        if record.observed == 0 {
            body.push_str(&format!("{}: 0 outliers (no observed values)\n", name));
        } else {
            body.push_str(&format!(
                "{}: {} outliers (bounds: {:.4} .. {:.4})\n",
                name, record.outlier_count, record.lower_bound, record.upper_bound
            ));
        }
    }
    Ok(body)
}

fn anomaly_section(
    df: &DataFrame,
    classes: &FieldClassification,
    options: &ReportOptions,
) -> Result<String> {
    match anomaly_detection::detect_anomalies_seeded(
        df,
        &classes.numeric,
        options.contamination,
        options.random_seed,
    ) {
        Ok(result) => Ok(format!(
            "Flagged rows: {} of {} (contamination: {}, threshold: {:.4})\n",
            result.flagged_count,
            df.row_count(),
            options.contamination,
            result.threshold
        )),
        // 前提条件を満たさない場合はレポートを止めずに注記を残す
        Err(Error::InsufficientData(reason)) => {
            Ok(format!("Skipped: insufficient data ({})\n", reason))
        }
        Err(err) => Err(err),
    }
}

fn statistics_section(df: &DataFrame, classes: &FieldClassification) -> Result<String> {
    if classes.numeric.is_empty() {
        return Ok("No numeric fields to summarize.\n".to_string());
    }

    let summaries = stats::summarize(df, &classes.numeric)?;

    let mut body = String::new();
    body.push_str(&format!(
        "{:<16} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for summary in summaries {
        body.push_str(&format!(
            "{:<16.16} {:>8} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}\n",
            summary.name,
            summary.count,
            summary.mean,
            summary.std,
            summary.min,
            summary.q1,
            summary.median,
            summary.q3,
            summary.max
        ));
    }
    Ok(body)
}

fn correlation_section(df: &DataFrame, classes: &FieldClassification) -> Result<String> {
    if classes.numeric.len() < 2 {
        return Ok("Fewer than two numeric fields; no correlation structure.\n".to_string());
    }

    let matrix = stats::correlation_matrix(df, &classes.numeric)?;

    let mut body = String::new();
    body.push_str(&format!("{:<16}", ""));
    for name in &matrix.columns {
        body.push_str(&format!(" {:>10.10}", name));
    }
    body.push('\n');

    for (i, name) in matrix.columns.iter().enumerate() {
        body.push_str(&format!("{:<16.16}", name));
        for value in &matrix.values[i] {
            body.push_str(&format!(" {:>10.4}", value));
        }
        body.push('\n');
    }
    Ok(body)
}

fn guidance_section(classes: &FieldClassification) -> String {
    let mut body = String::new();
    if classes.numeric.len() >= 3 {
        body.push_str("- Regression / clustering viable.\n");
    }
    if !classes.categorical.is_empty() {
        body.push_str("- Classification viable.\n");
    }
    if body.is_empty() {
        body.push_str("- Too little structure for modeling guidance.\n");
    }
    body
}

fn recommendations_section() -> String {
    let mut body = String::new();
    body.push_str("- Handle missing values before modeling.\n");
    body.push_str("- Inspect and treat the detected outliers.\n");
    body.push_str("- Encode categorical fields.\n");
    body.push_str("- Explore the distributions visually.\n");
    body
}

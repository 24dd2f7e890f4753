// 統計モジュール
//
// 記述統計量（平均、標準偏差、分位数など）と数値列間の相関構造を
// 計算します。すべての関数は純粋で、入力を変更しません。

pub mod descriptive;

use serde::Serialize;

use crate::dataframe::DataFrame;
use crate::error::Result;

/// データの基本統計量を計算
///
/// # 例
/// ```rust
/// use insightrs::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = stats::describe(&data).unwrap();
/// assert_eq!(stats.count, 5);
/// assert!((stats.mean - 3.0).abs() < 1e-10);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> Result<DescriptiveStats> {
    descriptive::describe_impl(data.as_ref())
}

/// 記述統計量の結果を保持する構造体
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    /// データの件数
    pub count: usize,
    /// 平均値
    pub mean: f64,
    /// 標準偏差（不偏推定量）
    pub std: f64,
    /// 最小値
    pub min: f64,
    /// 25%分位点
    pub q1: f64,
    /// 中央値（50%分位点）
    pub median: f64,
    /// 75%分位点
    pub q3: f64,
    /// 最大値
    pub max: f64,
}

/// 相関係数を計算
///
/// 2つの数値配列間のピアソン相関係数を計算します。
/// 相関係数は-1から1の範囲で、1は完全な正の相関、-1は完全な負の相関、
/// 0は相関がないことを示します。
///
/// # 例
/// ```rust
/// use insightrs::stats;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];
/// let corr = stats::correlation(&x, &y).unwrap();
/// assert!(corr > 0.0);
/// ```
pub fn correlation<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::correlation_impl(x.as_ref(), y.as_ref())
}

/// 共分散を計算
pub fn covariance<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::covariance_impl(x.as_ref(), y.as_ref())
}

/// 数値列ごとの記述統計量
///
/// すべての値がNULLの列は `count == 0` となり、他の統計量はNaNに
/// なります（エラーにはなりません）。
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// 列名
    pub name: String,
    /// NULLを除いた件数
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// 数値列×数値列の相関行列
///
/// 対称行列で対角成分は1.0です。分散がゼロの列を含むペアの相関は
/// 定義できないため、フォールバック値0.0を使用します。
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    /// 行・列に対応する列名（元の列順）
    pub columns: Vec<String>,
    /// 相関係数の行列
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// 列名ペアの相関係数を取得する
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// 数値列ごとの記述統計量をまとめて計算する
///
/// 列はNULLを除いた値で評価されます。
pub fn summarize(df: &DataFrame, numeric_names: &[String]) -> Result<Vec<ColumnSummary>> {
    df.ensure_analyzable()?;

    let mut summaries = Vec::with_capacity(numeric_names.len());
    for name in numeric_names {
        let observed = df.numeric_observed(name)?;

        let summary = match descriptive::describe_impl(&observed) {
            Ok(stats) => ColumnSummary {
                name: name.clone(),
                count: stats.count,
                mean: stats.mean,
                std: stats.std,
                min: stats.min,
                q1: stats.q1,
                median: stats.median,
                q3: stats.q3,
                max: stats.max,
            },
            // 全行NULLの列: 件数0、統計量はNaN
            Err(_) => ColumnSummary {
                name: name.clone(),
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q1: f64::NAN,
                median: f64::NAN,
                q3: f64::NAN,
                max: f64::NAN,
            },
        };
        summaries.push(summary);
    }

    Ok(summaries)
}

/// 数値列間のピアソン相関行列を計算する
///
/// NULLはペアワイズ除外します: あるペアの相関は両方の列で値が存在する
/// 行だけで計算されます。分散がゼロのペアや有効な行が2行未満のペアは
/// フォールバック値0.0になります。対角成分は常に1.0です。
pub fn correlation_matrix(df: &DataFrame, numeric_names: &[String]) -> Result<CorrelationMatrix> {
    df.ensure_analyzable()?;

    let n = numeric_names.len();
    let mut values = vec![vec![0.0; n]; n];

    // 各列のOption<f64>ビューを先に取り出す
    let mut options = Vec::with_capacity(n);
    for name in numeric_names {
        options.push(df.numeric_options(name)?);
    }

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            // ペアワイズ除外: 両方の値が存在する行だけを使う
            let mut x = Vec::new();
            let mut y = Vec::new();
            for (a, b) in options[i].iter().zip(options[j].iter()) {
                if let (Some(a), Some(b)) = (a, b) {
                    x.push(*a);
                    y.push(*b);
                }
            }

            let corr = descriptive::correlation_impl(&x, &y).unwrap_or(0.0);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric_names.to_vec(),
        values,
    })
}

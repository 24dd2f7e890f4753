//! 多変量異常検出モジュール
//!
//! 全数値列を同時に扱う孤立森（Isolation Forest）で、大域的に
//! 異常な行を検出します。ランダムな再帰分割で孤立させるまでの
//! 平均経路長が短い点ほど異常スコアが高くなります。

use crate::column::{Column, Float64Column, Int64Column};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::ml::pipeline::Transformer;
use crate::profile;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// 学習に必要な最小行数
pub const MIN_SAMPLES: usize = 10;

/// 既定の汚染率（異常値の期待割合）
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// 既定の乱数シード
///
/// シードを固定しているため、同じ入力からは常に同じ異常フラグが
/// 得られます。`random_seed: None` で非決定的な挙動に戻せます。
pub const DEFAULT_SEED: u64 = 42;

/// 孤立森（Isolation Forest）異常検出アルゴリズム
pub struct IsolationForest {
    /// 決定木の数
    n_estimators: usize,
    /// サブサンプリングのサイズ
    max_samples: Option<usize>,
    /// 乱数シード
    random_seed: Option<u64>,
    /// 汚染率（異常値の期待割合）
    contamination: f64,
    /// 各サンプルの異常スコア
    anomaly_scores: Vec<f64>,
    /// 異常のしきい値
    threshold: f64,
    /// 異常フラグ（1: 異常, -1: 正常）
    labels: Vec<i64>,
    /// 特徴量の名前
    feature_names: Vec<String>,
    /// 学習済みかどうか
    fitted: bool,
    /// 木のコレクション
    trees: Vec<ITree>,
}

/// Isolation Forestの決定木
struct ITree {
    /// 木の根ノード
    root: Option<Box<ITreeNode>>,
}

/// Isolation Forestの決定木のノード
struct ITreeNode {
    /// 分割特徴量のインデックス
    split_feature: Option<usize>,
    /// 分割閾値
    split_threshold: Option<f64>,
    /// 左の子ノード
    left: Option<Box<ITreeNode>>,
    /// 右の子ノード
    right: Option<Box<ITreeNode>>,
    /// このノードのサンプル数
    size: usize,
}

impl Default for IsolationForest {
    fn default() -> Self {
        IsolationForest {
            n_estimators: 100,
            max_samples: None,
            random_seed: Some(DEFAULT_SEED),
            contamination: DEFAULT_CONTAMINATION,
            anomaly_scores: Vec::new(),
            threshold: 0.0,
            labels: Vec::new(),
            feature_names: Vec::new(),
            fitted: false,
            trees: Vec::new(),
        }
    }
}

impl IsolationForest {
    /// 新しいIsolationForestインスタンスを作成
    pub fn new(
        n_estimators: usize,
        max_samples: Option<usize>,
        contamination: f64,
        random_seed: Option<u64>,
    ) -> Result<Self> {
        if contamination <= 0.0 || contamination >= 0.5 {
            return Err(Error::InvalidValue(format!(
                "汚染率は(0, 0.5)の範囲で指定してください: {}",
                contamination
            )));
        }
        if n_estimators == 0 {
            return Err(Error::InvalidValue("決定木の数は1以上が必要です".into()));
        }

        Ok(IsolationForest {
            n_estimators,
            max_samples,
            random_seed,
            contamination,
            anomaly_scores: Vec::new(),
            threshold: 0.0,
            labels: Vec::new(),
            feature_names: Vec::new(),
            fitted: false,
            trees: Vec::new(),
        })
    }

    /// 異常スコアを取得（0〜1、高いほど異常）
    pub fn anomaly_scores(&self) -> &[f64] {
        &self.anomaly_scores
    }

    /// 異常フラグを取得（1: 異常, -1: 正常）
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// 異常判定のしきい値を取得
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 学習に使用した特徴量の名前を取得
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// 指定した数値列で学習する
    ///
    /// 前提条件: 数値列が2列以上、行数がMIN_SAMPLES以上。満たさない
    /// 場合はInsufficientDataになります。NULLはその列のNULL以外の
    /// 値の平均で補完します。
    pub fn fit_columns(&mut self, df: &DataFrame, numeric_names: &[String]) -> Result<()> {
        df.ensure_analyzable()?;

        if numeric_names.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "異常検出には数値列が2列以上必要です: {}列",
                numeric_names.len()
            )));
        }

        let n_samples = df.row_count();
        if n_samples < MIN_SAMPLES {
            return Err(Error::InsufficientData(format!(
                "異常検出には{}行以上必要です: {}行",
                MIN_SAMPLES, n_samples
            )));
        }

        self.feature_names = numeric_names.to_vec();
        let n_features = self.feature_names.len();

        // データ行列を作成（NULLは列平均で補完）
        let mut data = vec![vec![0.0; n_features]; n_samples];
        for (col_idx, name) in self.feature_names.iter().enumerate() {
            let options = df.numeric_options(name)?;

            let observed: Vec<f64> = options.iter().filter_map(|v| *v).collect();
            let fill = if observed.is_empty() {
                0.0
            } else {
                observed.iter().sum::<f64>() / observed.len() as f64
            };

            for (row_idx, value) in options.into_iter().enumerate() {
                data[row_idx][col_idx] = value.unwrap_or(fill);
            }
        }

        log::debug!(
            "isolation forest fit: {} rows x {} features, contamination={}",
            n_samples,
            n_features,
            self.contamination
        );

        // 乱数生成器を初期化
        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        // サブサンプリングサイズを決定（paper推奨の256を上限とする）
        let sub_sample_size = match self.max_samples {
            Some(size) => size.clamp(2, n_samples),
            None => n_samples.min(256),
        };

        // 高さの制限を計算
        let height_limit = (sub_sample_size as f64).log2().ceil() as usize;

        // 決定木を構築
        self.trees.clear();
        for _ in 0..self.n_estimators {
            // サブサンプリング: インデックスをシャッフルして先頭を使う
            let mut indices: Vec<usize> = (0..n_samples).collect();
            for i in (1..indices.len()).rev() {
                let j = rng.random_range(0..=i);
                indices.swap(i, j);
            }
            indices.truncate(sub_sample_size);

            let root = build_tree(&data, &indices, height_limit, 0, &mut rng);
            self.trees.push(ITree { root });
        }

        // 異常スコアを計算
        let expected_path_length = c_factor(sub_sample_size);
        self.anomaly_scores = data
            .iter()
            .map(|row| {
                let path_length_sum: f64 = self
                    .trees
                    .iter()
                    .map(|tree| compute_path_length(&tree.root, row, 0))
                    .sum();
                let avg_path_length = path_length_sum / self.n_estimators as f64;

                // 正規化した異常スコア（高いほど異常、0〜1の範囲）
                2.0_f64.powf(-avg_path_length / expected_path_length)
            })
            .collect();

        // 閾値を計算（contamination率に基づく）
        let mut sorted_scores = self.anomaly_scores.clone();
        sorted_scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let threshold_idx = (self.contamination * n_samples as f64).round() as usize;
        self.threshold = sorted_scores
            .get(threshold_idx.max(1) - 1)
            .copied()
            .unwrap_or(0.5);

        // ラベルを割り当て
        self.labels = self
            .anomaly_scores
            .iter()
            .map(|&score| if score >= self.threshold { 1 } else { -1 })
            .collect();

        self.fitted = true;

        Ok(())
    }

    /// 異常スコアとフラグの列を追加した新しいDataFrameを返す
    ///
    /// 入力のDataFrameは変更されません。
    pub fn augment(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.fitted {
            return Err(Error::InvalidOperation(
                "IsolationForestはまだ学習されていません".into(),
            ));
        }

        if df.row_count() != self.anomaly_scores.len() {
            return Err(Error::InconsistentRowCount {
                expected: self.anomaly_scores.len(),
                found: df.row_count(),
            });
        }

        let mut result = df.clone();

        let mut scores_col = Float64Column::new(self.anomaly_scores.clone());
        scores_col.set_name("anomaly_score");
        let mut labels_col = Int64Column::new(self.labels.clone());
        labels_col.set_name("anomaly");

        result.add_column("anomaly_score", Column::Float64(scores_col))?;
        result.add_column("anomaly", Column::Int64(labels_col))?;

        Ok(result)
    }
}

impl Transformer for IsolationForest {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let classes = profile::classify_fields(df);
        self.fit_columns(df, &classes.numeric)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.augment(df)
    }

    fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        Transformer::fit(self, df)?;
        self.transform(df)
    }
}

/// 決定木を構築
fn build_tree(
    data: &[Vec<f64>],
    indices: &[usize],
    height_limit: usize,
    depth: usize,
    rng: &mut StdRng,
) -> Option<Box<ITreeNode>> {
    if indices.is_empty() {
        return None;
    }

    if depth >= height_limit || indices.len() <= 1 {
        return Some(Box::new(ITreeNode {
            split_feature: None,
            split_threshold: None,
            left: None,
            right: None,
            size: indices.len(),
        }));
    }

    // ランダムに特徴量を選択
    let n_features = data[0].len();
    let split_feature = rng.random_range(0..n_features);

    // 選択した特徴量の最小値と最大値を求める
    let min_val = indices
        .iter()
        .map(|&i| data[i][split_feature])
        .fold(f64::INFINITY, f64::min);
    let max_val = indices
        .iter()
        .map(|&i| data[i][split_feature])
        .fold(f64::NEG_INFINITY, f64::max);

    // 最小値と最大値が同じ場合は分割できない
    if (max_val - min_val).abs() < f64::EPSILON {
        return Some(Box::new(ITreeNode {
            split_feature: None,
            split_threshold: None,
            left: None,
            right: None,
            size: indices.len(),
        }));
    }

    // 閾値をランダムに選択
    let split_threshold = min_val + rng.random::<f64>() * (max_val - min_val);

    // データを分割
    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for &idx in indices {
        if data[idx][split_feature] < split_threshold {
            left_indices.push(idx);
        } else {
            right_indices.push(idx);
        }
    }

    // 左右の子ノードを再帰的に構築
    let left = build_tree(data, &left_indices, height_limit, depth + 1, rng);
    let right = build_tree(data, &right_indices, height_limit, depth + 1, rng);

    Some(Box::new(ITreeNode {
        split_feature: Some(split_feature),
        split_threshold: Some(split_threshold),
        left,
        right,
        size: indices.len(),
    }))
}

/// サンプルの経路長を計算
fn compute_path_length(node: &Option<Box<ITreeNode>>, x: &[f64], current_height: usize) -> f64 {
    match node {
        None => current_height as f64,
        Some(node) => match (node.split_feature, node.split_threshold) {
            (Some(feature), Some(threshold)) => {
                if x[feature] < threshold {
                    compute_path_length(&node.left, x, current_height + 1)
                } else {
                    compute_path_length(&node.right, x, current_height + 1)
                }
            }
            _ => current_height as f64 + c_factor(node.size),
        },
    }
}

/// 調整係数c(n)を計算
///
/// n点の二分探索木における探索の平均経路長。スコアの正規化に
/// 使うため整数に丸めず浮動小数点のまま返します。
fn c_factor(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }

    let n = n as f64;
    let h = (n - 1.0).ln() + 0.5772156649; // 調和数の近似（オイラー定数）
    2.0 * h - (2.0 * (n - 1.0) / n)
}

/// 多変量異常検出の結果
pub struct AnomalyResult {
    /// 異常と判定された行だけのDataFrame
    pub flagged: DataFrame,
    /// anomaly_score列とanomaly列を追加した元データのDataFrame
    pub augmented: DataFrame,
    /// 各行の異常スコア
    pub scores: Vec<f64>,
    /// 異常フラグ（1: 異常, -1: 正常）
    pub labels: Vec<i64>,
    /// 異常判定のしきい値
    pub threshold: f64,
    /// 異常と判定された行数
    pub flagged_count: usize,
}

/// 数値列全体に対して孤立森による異常検出を実行する
///
/// シードは既定値に固定されるため結果は再現可能です。前提条件を
/// 満たさない場合はInsufficientDataを返します。
pub fn detect_anomalies(
    df: &DataFrame,
    numeric_names: &[String],
    contamination: f64,
) -> Result<AnomalyResult> {
    detect_anomalies_seeded(df, numeric_names, contamination, Some(DEFAULT_SEED))
}

/// シードを指定して孤立森による異常検出を実行する
pub fn detect_anomalies_seeded(
    df: &DataFrame,
    numeric_names: &[String],
    contamination: f64,
    random_seed: Option<u64>,
) -> Result<AnomalyResult> {
    let mut forest = IsolationForest::new(100, None, contamination, random_seed)?;
    forest.fit_columns(df, numeric_names)?;

    let augmented = forest.augment(df)?;
    let mask: Vec<bool> = forest.labels().iter().map(|&l| l == 1).collect();
    let flagged = df.filter_by_mask(&mask)?;
    let flagged_count = mask.iter().filter(|&&m| m).count();

    Ok(AnomalyResult {
        flagged,
        augmented,
        scores: forest.anomaly_scores().to_vec(),
        labels: forest.labels().to_vec(),
        threshold: forest.threshold(),
        flagged_count,
    })
}

// 可視化サポートモジュール
//
// このクレートはチャートを描画しません。描画はプレゼンテーション層の
// 責務です。ここでは描画側が解釈するチャート種別だけを定義します。

use serde::{Deserialize, Serialize};

/// プレゼンテーション層が描画できるチャートの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    /// 散布図
    Scatter,
    /// 棒グラフ
    Bar,
    /// 折れ線グラフ
    Line,
    /// 箱ひげ図
    Box,
    /// ヒストグラム
    Histogram,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_serde_roundtrip() {
        let json = serde_json::to_string(&ChartKind::Scatter).unwrap();
        assert_eq!(json, "\"Scatter\"");

        let kind: ChartKind = serde_json::from_str("\"Histogram\"").unwrap();
        assert_eq!(kind, ChartKind::Histogram);
    }
}

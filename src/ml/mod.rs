//! 機械学習機能を提供するモジュール
//!
//! データ変換パイプラインと多変量異常検出を提供します。

pub mod anomaly_detection;
pub mod pipeline;

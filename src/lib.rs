// 特定の警告を無効化
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod column;
pub mod dataframe;
pub mod error;
pub mod io;
pub mod ml;
pub mod profile;
pub mod report;
pub mod stats;
pub mod vis;

// Re-export commonly used types
pub use column::{BooleanColumn, Column, ColumnTrait, ColumnType, Float64Column, Int64Column, StringColumn};
pub use dataframe::DataFrame;
pub use error::{InsightRSError, Result};
pub use ml::anomaly_detection::{detect_anomalies, AnomalyResult, IsolationForest};
pub use profile::{classify_fields, missing_census, range_outliers, FieldClassification, OutlierRecord};
pub use report::{generate_report, generate_report_with, ReportOptions};
pub use stats::{ColumnSummary, CorrelationMatrix, DescriptiveStats};
pub use vis::ChartKind;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

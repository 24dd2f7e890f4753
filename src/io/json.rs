//! JSON出力機能
//!
//! プレゼンテーション層が派生テーブルを描画・ダウンロードできるように、
//! レコード形式 `[{col: val, ...}, ...]` のJSONを生成します。

use serde_json::{Map, Number, Value};

use crate::column::Column;
use crate::dataframe::DataFrame;
use crate::error::Result;

impl DataFrame {
    /// DataFrameをレコード形式のJSON文字列に変換する
    ///
    /// NULL値は `null` として出力されます。
    pub fn to_json(&self) -> Result<String> {
        let mut views = Vec::with_capacity(self.column_count());
        for name in self.column_names() {
            views.push(self.column(name)?);
        }

        let mut records = Vec::with_capacity(self.row_count());

        for i in 0..self.row_count() {
            let mut record = Map::new();
            for (name, view) in self.column_names().iter().zip(views.iter()) {
                let value = match view.column() {
                    Column::Int64(col) => match col.get(i)? {
                        Some(v) => Value::Number(Number::from(v)),
                        None => Value::Null,
                    },
                    Column::Float64(col) => match col.get(i)? {
                        Some(v) => Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
                        None => Value::Null,
                    },
                    Column::String(col) => match col.get(i)? {
                        Some(v) => Value::String(v.to_string()),
                        None => Value::Null,
                    },
                    Column::Boolean(col) => match col.get(i)? {
                        Some(v) => Value::Bool(v),
                        None => Value::Null,
                    },
                };
                record.insert(name.clone(), value);
            }
            records.push(Value::Object(record));
        }

        let text = serde_json::to_string(&Value::Array(records))?;
        Ok(text)
    }
}

//! CSV入出力機能
//!
//! 文字列バッファに読み込んだ後、列ごとに型推論を行います。
//! 型付き列（数値・ブール）の空フィールドはNULLになります。
//! 文字列列の空フィールドは空文字列のまま保持されます。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Writer};

use crate::column::{BooleanColumn, Column, Float64Column, Int64Column, StringColumn};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

impl DataFrame {
    /// CSVファイルからDataFrameを読み込む
    ///
    /// # Arguments
    /// * `path` - CSVファイルのパス
    /// * `has_header` - ヘッダー行があるかどうか
    pub fn from_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_csv_reader(file, has_header)
    }

    /// CSV文字列からDataFrameを読み込む
    pub fn from_csv_str(text: &str, has_header: bool) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes(), has_header)
    }

    fn from_csv_reader<R: Read>(reader: R, has_header: bool) -> Result<Self> {
        // CSVリーダーを設定
        let mut rdr = ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut df = Self::new();

        // ヘッダー行を取得
        let headers: Vec<String> = if has_header {
            rdr.headers()
                .map_err(|e| Error::CsvError(e.to_string()))?
                .iter()
                .map(|h| h.to_string())
                .collect()
        } else {
            Vec::new()
        };

        // 列データの収集用バッファ
        let mut str_buffers: Vec<Vec<String>> = headers.iter().map(|_| Vec::new()).collect();
        let mut generated_headers = headers;

        // すべての行を読み込み
        for result in rdr.records() {
            let record = result.map_err(|e| Error::CsvError(e.to_string()))?;

            // ヘッダーがない場合は最初のレコードから列名を生成
            if generated_headers.is_empty() {
                generated_headers = (0..record.len()).map(|i| format!("column_{}", i)).collect();
                str_buffers = generated_headers.iter().map(|_| Vec::new()).collect();
            }

            for (i, field) in record.iter().enumerate() {
                if i < str_buffers.len() {
                    str_buffers[i].push(field.to_string());
                }
            }
            // 不足分をNULL扱いの空フィールドとして追加
            let row_len = str_buffers.iter().map(|b| b.len()).max().unwrap_or(0);
            for buffer in &mut str_buffers {
                while buffer.len() < row_len {
                    buffer.push(String::new());
                }
            }
        }

        // 文字列データを型推論して列を追加
        for (header, values) in generated_headers.into_iter().zip(str_buffers.into_iter()) {
            df.add_column(header, infer_column(&values))?;
        }

        Ok(df)
    }

    /// DataFrameをCSVファイルに書き込む
    ///
    /// NULL値は空フィールドとして出力されます。
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, has_header: bool) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|e| Error::IoError(e.to_string()))?;
        let mut wtr = Writer::from_writer(file);

        // ヘッダー行を書き込む
        if has_header {
            wtr.write_record(self.column_names())
                .map_err(|e| Error::CsvError(e.to_string()))?;
        }

        // 各行を書き込む
        let mut views = Vec::with_capacity(self.column_count());
        for name in self.column_names() {
            views.push(self.column(name)?);
        }

        for i in 0..self.row_count() {
            let mut row = Vec::with_capacity(self.column_count());
            for view in &views {
                let value = view.column().get_as_string(i)?.unwrap_or_default();
                row.push(value);
            }
            wtr.write_record(&row)
                .map_err(|e| Error::CsvError(e.to_string()))?;
        }

        wtr.flush().map_err(|e| Error::IoError(e.to_string()))?;
        Ok(())
    }
}

/// 文字列値の列を型推論してColumnに変換する
///
/// 推論の優先順位は 整数 → 浮動小数点 → ブール → 文字列 です。
/// 空フィールドは推論の対象から除外され、型付き列ではNULLになります。
fn infer_column(values: &[String]) -> Column {
    let non_empty: Vec<&String> = values.iter().filter(|s| !s.is_empty()).collect();

    // すべて空の場合は文字列型
    if non_empty.is_empty() {
        return Column::String(StringColumn::new(values.to_vec()));
    }

    // 整数型として解析を試みる
    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        let data: Vec<i64> = values
            .iter()
            .map(|s| s.parse::<i64>().unwrap_or(0))
            .collect();
        let nulls: Vec<bool> = values.iter().map(|s| s.is_empty()).collect();
        return Column::Int64(Int64Column::with_nulls(data, nulls));
    }

    // 浮動小数点型として解析を試みる
    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        let data: Vec<f64> = values
            .iter()
            .map(|s| s.parse::<f64>().unwrap_or(f64::NAN))
            .collect();
        let nulls: Vec<bool> = values.iter().map(|s| s.is_empty()).collect();
        return Column::Float64(Float64Column::with_nulls(data, nulls));
    }

    // ブール型として解析を試みる
    let is_bool_token = |s: &str| {
        let lower = s.to_lowercase();
        matches!(lower.as_str(), "true" | "false" | "yes" | "no" | "t" | "f")
    };
    if non_empty.iter().all(|s| is_bool_token(s)) {
        let data: Vec<bool> = values
            .iter()
            .map(|s| {
                let lower = s.to_lowercase();
                matches!(lower.as_str(), "true" | "yes" | "t")
            })
            .collect();
        let nulls: Vec<bool> = values.iter().map(|s| s.is_empty()).collect();
        return Column::Boolean(BooleanColumn::with_nulls(data, nulls));
    }

    // デフォルトは文字列型（空文字列もそのまま値として保持する）
    Column::String(StringColumn::new(values.to_vec()))
}

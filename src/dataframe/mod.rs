// DataFrame実装モジュール
//
// 列指向ストレージを使用したDataFrameを提供します。すべての派生操作は
// 新しいDataFrameを返し、入力を変更しません。

use std::collections::HashMap;
use std::fmt::{self, Debug};

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};

/// 列指向のDataFrame実装
///
/// 不変条件: すべての列は同じ行数を持ち、列名は一意です。
#[derive(Clone)]
pub struct DataFrame {
    // 列データ
    columns: Vec<Column>,
    // 列名→インデックスのマッピング
    column_indices: HashMap<String, usize>,
    // 列の順序
    column_names: Vec<String>,
    // 行数
    row_count: usize,
}

/// 列に対するビュー（参照）を表す構造体
#[derive(Clone)]
pub struct ColumnView {
    column: Column,
}

impl ColumnView {
    /// 列の長さを返す
    pub fn len(&self) -> usize {
        self.column.len()
    }

    /// 列が空かどうかを返す
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    /// 列の型を返す
    pub fn column_type(&self) -> ColumnType {
        self.column.column_type()
    }

    /// 内部のColumnへの参照を取得する
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Float64列として取得する
    pub fn as_float64(&self) -> Option<&crate::column::Float64Column> {
        match &self.column {
            Column::Float64(col) => Some(col),
            _ => None,
        }
    }

    /// Int64列として取得する
    pub fn as_int64(&self) -> Option<&crate::column::Int64Column> {
        match &self.column {
            Column::Int64(col) => Some(col),
            _ => None,
        }
    }

    /// 文字列列として取得する
    pub fn as_string(&self) -> Option<&crate::column::StringColumn> {
        match &self.column {
            Column::String(col) => Some(col),
            _ => None,
        }
    }

    /// ブール列として取得する
    pub fn as_boolean(&self) -> Option<&crate::column::BooleanColumn> {
        match &self.column {
            Column::Boolean(col) => Some(col),
            _ => None,
        }
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// 新しい空のDataFrameを作成
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            column_indices: HashMap::new(),
            column_names: Vec::new(),
            row_count: 0,
        }
    }

    /// 列を追加
    pub fn add_column<C: Into<Column>>(&mut self, name: impl Into<String>, column: C) -> Result<()> {
        let name = name.into();
        let column = column.into();

        // 列名の重複チェック
        if self.column_indices.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        // 行数の整合性チェック
        let column_len = column.len();
        if !self.columns.is_empty() && column_len != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column_len,
            });
        }

        // 列の追加
        let column_idx = self.columns.len();
        self.columns.push(column);
        self.column_indices.insert(name.clone(), column_idx);
        self.column_names.push(name);

        // 最初の列の場合は行数を設定
        if self.row_count == 0 {
            self.row_count = column_len;
        }

        Ok(())
    }

    /// 列の参照を取得
    pub fn column(&self, name: &str) -> Result<ColumnView> {
        let column_idx = self
            .column_indices
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;

        let column = self.columns[*column_idx].clone();
        Ok(ColumnView { column })
    }

    /// 列の型を取得
    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        let column_idx = self
            .column_indices
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;

        Ok(self.columns[*column_idx].column_type())
    }

    /// 列名のリストを取得
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// 列が存在するかどうかを確認
    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    /// 行数を取得
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// 列数を取得
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 列のNULL値の数を取得
    pub fn null_count(&self, name: &str) -> Result<usize> {
        let column_idx = self
            .column_indices
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;

        Ok(self.columns[*column_idx].null_count())
    }

    /// 数値列の全行をOption<f64>として取得する
    ///
    /// Int64列は浮動小数点に変換されます。数値列以外はエラーになります。
    pub fn numeric_options(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let view = self.column(name)?;
        if let Some(float_col) = view.as_float64() {
            Ok(float_col.to_options())
        } else if let Some(int_col) = view.as_int64() {
            Ok(int_col.to_options())
        } else {
            Err(Error::Cast(format!("列 '{}' は数値型ではありません", name)))
        }
    }

    /// 数値列のNULLを除いた値を取得する
    pub fn numeric_observed(&self, name: &str) -> Result<Vec<f64>> {
        let view = self.column(name)?;
        if let Some(float_col) = view.as_float64() {
            Ok(float_col.observed())
        } else if let Some(int_col) = view.as_int64() {
            Ok(int_col.observed())
        } else {
            Err(Error::Cast(format!("列 '{}' は数値型ではありません", name)))
        }
    }

    /// ブールマスクで行を絞り込んだ新しいDataFrameを作成する
    pub fn filter_by_mask(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.row_count {
            return Err(Error::LengthMismatch {
                expected: self.row_count,
                actual: mask.len(),
            });
        }

        let mut result = Self::new();
        for (name, column) in self.column_names.iter().zip(self.columns.iter()) {
            result.add_column(name.clone(), column.filter_by_mask(mask)?)?;
        }

        Ok(result)
    }

    /// 先頭n行のDataFrameを作成する
    pub fn head(&self, n: usize) -> Result<Self> {
        let mask: Vec<bool> = (0..self.row_count).map(|i| i < n).collect();
        self.filter_by_mask(&mask)
    }

    /// 分析可能な状態かどうかを検証する
    ///
    /// 空のテーブル（行数0または列数0）は分析できません。
    pub fn ensure_analyzable(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::EmptyData("テーブルに列がありません".into()));
        }
        if self.row_count == 0 {
            return Err(Error::EmptyData("テーブルに行がありません".into()));
        }
        Ok(())
    }
}

impl Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 最大表示行数
        const MAX_ROWS: usize = 10;

        if self.columns.is_empty() {
            return write!(f, "DataFrame (0 rows x 0 columns)");
        }

        writeln!(
            f,
            "DataFrame ({} rows x {} columns):",
            self.row_count,
            self.columns.len()
        )?;

        // 列ヘッダーの表示
        write!(f, "{:<5} |", "idx")?;
        for name in &self.column_names {
            write!(f, " {:<15} |", name)?;
        }
        writeln!(f)?;

        // 区切り線
        write!(f, "{:-<5}-+", "")?;
        for _ in &self.column_names {
            write!(f, "-{:-<15}-+", "")?;
        }
        writeln!(f)?;

        // 最大MAX_ROWS行まで表示
        let display_rows = std::cmp::min(self.row_count, MAX_ROWS);
        for i in 0..display_rows {
            write!(f, "{:<5} |", i)?;
            for column in &self.columns {
                let value = column
                    .get_as_string(i)
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "NULL".to_string());
                write!(f, " {:<15} |", value)?;
            }
            writeln!(f)?;
        }

        // 省略表示
        if self.row_count > MAX_ROWS {
            writeln!(f, "... ({} more rows)", self.row_count - MAX_ROWS)?;
        }

        Ok(())
    }
}

use std::any::Any;
use std::sync::Arc;

use crate::column::common::{self, utils, Column, ColumnTrait, ColumnType, NullMask};
use crate::error::Result;

/// Int64型の列を表す構造体
#[derive(Debug, Clone)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
    pub(crate) null_mask: NullMask,
    pub(crate) name: Option<String>,
}

impl Int64Column {
    /// 新しいInt64Columnを作成する
    pub fn new(data: Vec<i64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// 名前付きのInt64Columnを作成する
    pub fn with_name(data: Vec<i64>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    /// NULL値を含むInt64Columnを作成する
    pub fn with_nulls(data: Vec<i64>, nulls: Vec<bool>) -> Self {
        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(utils::create_bitmask(&nulls))
        } else {
            None
        };

        Self {
            data: data.into(),
            null_mask,
            name: None,
        }
    }

    /// 名前を設定する
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// 名前を取得する
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// インデックスでデータを取得する（NULLはNone）
    pub fn get(&self, index: usize) -> Result<Option<i64>> {
        common::check_index(index, self.data.len())?;

        if let Some(ref mask) = self.null_mask {
            if utils::bit_is_set(mask, index) {
                return Ok(None);
            }
        }

        Ok(Some(self.data[index]))
    }

    /// NULLを除いた値をf64のベクトルとして取得する
    pub fn observed(&self) -> Vec<f64> {
        match &self.null_mask {
            None => self.data.iter().map(|&v| v as f64).collect(),
            Some(mask) => (0..self.data.len())
                .filter(|&i| !utils::bit_is_set(mask, i))
                .map(|i| self.data[i] as f64)
                .collect(),
        }
    }

    /// 全行をOption<f64>のベクトルとして取得する
    pub fn to_options(&self) -> Vec<Option<f64>> {
        (0..self.data.len())
            .map(|i| {
                if let Some(ref mask) = self.null_mask {
                    if utils::bit_is_set(mask, i) {
                        return None;
                    }
                }
                Some(self.data[i] as f64)
            })
            .collect()
    }

    /// ブールマスクで行を絞り込んだ新しい列を作成する
    pub(crate) fn filter_by_mask(&self, mask: &[bool]) -> Result<Self> {
        let mut filtered_data = Vec::new();
        let mut filtered_nulls = Vec::new();

        for (i, &keep) in mask.iter().enumerate() {
            if keep {
                let value = self.get(i)?;
                filtered_data.push(value.unwrap_or(0));
                filtered_nulls.push(value.is_none());
            }
        }

        let mut col = Self::with_nulls(filtered_data, filtered_nulls);
        col.name = self.name.clone();
        Ok(col)
    }
}

impl ColumnTrait for Int64Column {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Int64
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn null_count(&self) -> usize {
        match &self.null_mask {
            None => 0,
            Some(mask) => utils::count_set_bits(mask, self.data.len()),
        }
    }

    fn clone_column(&self) -> Column {
        Column::Int64(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

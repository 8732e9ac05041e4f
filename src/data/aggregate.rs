use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::error::QueryError;
use super::filter::FilteredView;
use super::model::{Column, KeyValue};

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

/// Combines the present values of one column within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reducer {
    /// Number of present values. Never missing.
    Count,
    #[default]
    Mean,
    Sum,
    Min,
    Max,
    Median,
}

impl Reducer {
    /// Reduce `values`; `None` when there is nothing to reduce (except `Count`).
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        let n = values.len() as f64;
        match self {
            Reducer::Count => Some(n),
            _ if values.is_empty() => None,
            Reducer::Sum => Some(values.iter().sum()),
            Reducer::Mean => Some(values.iter().sum::<f64>() / n),
            Reducer::Min => Some(values.iter().copied().fold(f64::INFINITY, f64::min)),
            Reducer::Max => Some(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            Reducer::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                Some(quantile_sorted(&sorted, 0.5))
            }
        }
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// AggregateTable
// ---------------------------------------------------------------------------

/// One group: its key values (in key column order), one reduced value per
/// value column, and how many input rows fell into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub keys: Vec<KeyValue>,
    pub values: Vec<Option<f64>>,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Grouped, reduced numeric summary. Keys are unique; rows come out in
/// ascending key order until re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    key_columns: Vec<Column>,
    value_columns: Vec<Column>,
    reducer: Reducer,
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn key_columns(&self) -> &[Column] {
        &self.key_columns
    }

    pub fn value_columns(&self) -> &[Column] {
        &self.value_columns
    }

    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a key column, or [`QueryError::NotInTable`].
    pub fn key_index(&self, column: Column) -> Result<usize, QueryError> {
        self.key_columns
            .iter()
            .position(|&c| c == column)
            .ok_or(QueryError::NotInTable(column))
    }

    /// Position of a value column, or [`QueryError::NotInTable`].
    pub fn value_index(&self, column: Column) -> Result<usize, QueryError> {
        self.value_columns
            .iter()
            .position(|&c| c == column)
            .ok_or(QueryError::NotInTable(column))
    }

    /// The row with exactly these keys.
    pub fn get(&self, keys: &[KeyValue]) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| r.keys == keys)
    }

    /// Reduced value of `column` for the row with `keys`.
    pub fn value(&self, keys: &[KeyValue], column: Column) -> Result<Option<f64>, QueryError> {
        let idx = self.value_index(column)?;
        Ok(self.get(keys).and_then(|r| r.values[idx]))
    }

    /// Stable sort by one value column; missing values always go last.
    pub fn sorted_by(mut self, column: Column, order: SortOrder) -> Result<Self, QueryError> {
        let idx = self.value_index(column)?;
        self.rows.sort_by(|a, b| match (a.values[idx], b.values[idx]) {
            (Some(x), Some(y)) => match order {
                SortOrder::Ascending => x.total_cmp(&y),
                SortOrder::Descending => y.total_cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(self)
    }

    /// Keep the first `n` rows.
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Keep rows whose value in key column `column` satisfies `keep`.
    pub fn retain_keys(
        mut self,
        column: Column,
        mut keep: impl FnMut(&KeyValue) -> bool,
    ) -> Result<Self, QueryError> {
        let idx = self.key_index(column)?;
        self.rows.retain(|r| keep(&r.keys[idx]));
        Ok(self)
    }

    /// Re-aggregate this table by a subset of its key columns, reducing every
    /// value column across the merged rows (e.g. mean of per-model means).
    pub fn rollup(&self, group_keys: &[Column], reducer: Reducer) -> Result<AggregateTable, QueryError> {
        if group_keys.is_empty() {
            return Err(QueryError::NoGroupKeys);
        }
        let positions = group_keys
            .iter()
            .map(|&c| self.key_index(c))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self.rows.iter().map(|row| {
            let keys = positions.iter().map(|&p| row.keys[p].clone()).collect();
            (keys, row.values.clone())
        });
        Ok(group(rows, group_keys.to_vec(), self.value_columns.clone(), reducer))
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

struct Partition {
    size: usize,
    samples: Vec<Vec<f64>>,
}

/// Partition `(keys, values)` rows by key and reduce each value column.
fn group<I>(rows: I, key_columns: Vec<Column>, value_columns: Vec<Column>, reducer: Reducer) -> AggregateTable
where
    I: IntoIterator<Item = (Vec<KeyValue>, Vec<Option<f64>>)>,
{
    let width = value_columns.len();
    let mut partitions: BTreeMap<Vec<KeyValue>, Partition> = BTreeMap::new();

    for (keys, values) in rows {
        let part = partitions.entry(keys).or_insert_with(|| Partition {
            size: 0,
            samples: vec![Vec::new(); width],
        });
        part.size += 1;
        for (sample, value) in part.samples.iter_mut().zip(values) {
            if let Some(v) = value {
                sample.push(v);
            }
        }
    }

    let rows = partitions
        .into_iter()
        .map(|(keys, part)| AggregateRow {
            keys,
            values: part.samples.iter().map(|s| reducer.reduce(s)).collect(),
            size: part.size,
        })
        .collect();

    AggregateTable {
        key_columns,
        value_columns,
        reducer,
        rows,
    }
}

pub(crate) fn check_group_keys(group_keys: &[Column]) -> Result<(), QueryError> {
    if group_keys.is_empty() {
        return Err(QueryError::NoGroupKeys);
    }
    match group_keys.iter().find(|c| !c.is_groupable()) {
        Some(&c) => Err(QueryError::NotGroupable(c)),
        None => Ok(()),
    }
}

pub(crate) fn check_value_columns(value_columns: &[Column]) -> Result<(), QueryError> {
    match value_columns.iter().find(|c| !c.is_numeric()) {
        Some(&c) => Err(QueryError::NotNumeric(c)),
        None => Ok(()),
    }
}

/// Group the view by `group_keys` and reduce each of `value_columns` per group.
///
/// Missing and invalid cells do not contribute; a group with no present
/// values for a column gets `None` there. The query is validated before any
/// row is read.
pub fn aggregate(
    view: &FilteredView<'_>,
    group_keys: &[Column],
    value_columns: &[Column],
    reducer: Reducer,
) -> Result<AggregateTable, QueryError> {
    check_group_keys(group_keys)?;
    check_value_columns(value_columns)?;

    let mut rows = Vec::with_capacity(view.len());
    for rec in view.iter() {
        let keys = group_keys
            .iter()
            .map(|&c| rec.key(c))
            .collect::<Result<Vec<_>, _>>()?;
        let values = value_columns
            .iter()
            .map(|&c| rec.number(c).map(|cell| cell.value()))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((keys, values));
    }

    Ok(group(rows, group_keys.to_vec(), value_columns.to_vec(), reducer))
}

/// [`aggregate`] with columns addressed by their header names.
pub fn aggregate_by_name(
    view: &FilteredView<'_>,
    group_keys: &[&str],
    value_columns: &[&str],
    reducer: Reducer,
) -> Result<AggregateTable, QueryError> {
    let keys = group_keys
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<Column>, _>>()?;
    let values = value_columns
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<Column>, _>>()?;
    aggregate(view, &keys, &values, reducer)
}

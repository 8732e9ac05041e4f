use std::collections::BTreeMap;

use super::aggregate::{check_group_keys, check_value_columns, quantile_sorted};
use super::error::QueryError;
use super::filter::FilteredView;
use super::model::{Column, KeyValue};

/// Five-number summary of one group, plus Tukey whiskers (the furthest data
/// points within 1.5 × IQR of the box).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub count: usize,
}

impl Spread {
    /// `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Spread> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(min);
        let upper_whisker = sorted.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(max);

        Some(Spread {
            min,
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            max,
            lower_whisker,
            upper_whisker,
            count: sorted.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadRow {
    pub key: KeyValue,
    /// `None` when the group has no present values.
    pub spread: Option<Spread>,
}

/// Distribution of `value` within each distinct `key` of the view, in
/// ascending key order.
pub fn spread(view: &FilteredView<'_>, key: Column, value: Column) -> Result<Vec<SpreadRow>, QueryError> {
    check_group_keys(&[key])?;
    check_value_columns(&[value])?;

    let mut groups: BTreeMap<KeyValue, Vec<f64>> = BTreeMap::new();
    for rec in view.iter() {
        let samples = groups.entry(rec.key(key)?).or_default();
        if let Some(v) = rec.number(value)?.value() {
            samples.push(v);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, values)| SpreadRow {
            key,
            spread: Spread::from_values(&values),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CarDataset, CarRecord, CellValue};

    #[test]
    fn five_numbers_and_whiskers() {
        let s = Spread::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (1.0, 2.0, 3.0, 4.0, 100.0));
        assert_eq!(s.lower_whisker, 1.0);
        // 100 lies beyond q3 + 1.5 * IQR = 7
        assert_eq!(s.upper_whisker, 4.0);
        assert_eq!(s.count, 5);
        assert!(Spread::from_values(&[]).is_none());
    }

    #[test]
    fn spread_per_drive_system() {
        let rec = |drive: Option<&str>, rating: Option<f64>| CarRecord {
            drive_system: drive.map(String::from),
            rating: rating.map_or(CellValue::Missing, CellValue::Present),
            ..CarRecord::new("Kia", "EV6")
        };
        let ds = CarDataset::from_records(vec![
            rec(Some("AWD"), Some(7.0)),
            rec(Some("AWD"), Some(9.0)),
            rec(Some("FWD"), None),
            rec(None, Some(5.0)),
        ]);
        let rows = spread(&FilteredView::all(&ds), Column::DriveSystem, Column::Rating).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].key, KeyValue::Missing);
        assert_eq!(rows[1].spread.map(|s| s.median), Some(8.0));
        assert_eq!(rows[2].key, KeyValue::text("FWD"));
        assert!(rows[2].spread.is_none());

        assert_eq!(
            spread(&FilteredView::all(&ds), Column::Rating, Column::Rating),
            Err(QueryError::NotGroupable(Column::Rating))
        );
    }
}

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{CarDataset, CarRecord, Column};

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per categorical column
// ---------------------------------------------------------------------------

/// Allowed values for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No constraint: every record passes, including ones with a missing value.
    #[default]
    All,
    /// Only these values pass. An empty set passes nothing.
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    /// Whether `value` is currently ticked (everything is, under `All`).
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    /// Every value of `domain` ticked. A column with no present values has
    /// nothing to tick, so it gets `All`.
    pub fn everything(domain: &BTreeSet<String>) -> Self {
        if domain.is_empty() {
            Selection::All
        } else {
            Selection::Only(domain.clone())
        }
    }

    /// Number of ticked values out of `domain`.
    pub fn count_in(&self, domain: &BTreeSet<String>) -> usize {
        match self {
            Selection::All => domain.len(),
            Selection::Only(set) => domain.iter().filter(|v| set.contains(*v)).count(),
        }
    }

    /// Flip a single value, expanding `All` into an explicit set first.
    pub fn toggle(&mut self, value: &str, domain: &BTreeSet<String>) {
        if let Selection::All = self {
            *self = Selection::Only(domain.clone());
        }
        if let Selection::Only(set) = self {
            if !set.remove(value) {
                set.insert(value.to_string());
            }
        }
    }

    /// A record passes a column selection when:
    /// * the selection is `All` → passes
    /// * the selected set is empty → nothing selected → fails
    /// * the set covers the column's whole non-empty domain → passes (missing included)
    /// * otherwise the record's value must be in the set; missing never is
    fn admits(&self, value: Option<&str>, domain: Option<&BTreeSet<String>>) -> bool {
        let set = match self {
            Selection::All => return true,
            Selection::Only(set) => set,
        };
        if set.is_empty() {
            return false;
        }
        if domain.is_some_and(|all| !all.is_empty() && all.iter().all(|v| set.contains(v))) {
            return true;
        }
        value.is_some_and(|v| set.contains(v))
    }
}

/// The user's current filter choices.
///
/// The default criteria match every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub brands: Selection,
    pub transmissions: Selection,
    pub drives: Selection,
    pub engines: Selection,
    /// Inclusive year range; `None` admits every record, even ones without a year.
    pub years: Option<RangeInclusive<i64>>,
}

impl FilterCriteria {
    /// Criteria with every known value ticked and the given year range,
    /// which is what a freshly loaded dashboard shows.
    pub fn select_all(dataset: &CarDataset, years: Option<RangeInclusive<i64>>) -> Self {
        let all = |col| {
            dataset
                .domain(col)
                .map_or(Selection::All, Selection::everything)
        };
        FilterCriteria {
            brands: all(Column::Brand),
            transmissions: all(Column::Transmission),
            drives: all(Column::DriveSystem),
            engines: all(Column::EngineType),
            years,
        }
    }

    pub fn selection(&self, column: Column) -> Option<&Selection> {
        match column {
            Column::Brand => Some(&self.brands),
            Column::Transmission => Some(&self.transmissions),
            Column::DriveSystem => Some(&self.drives),
            Column::EngineType => Some(&self.engines),
            _ => None,
        }
    }

    pub fn selection_mut(&mut self, column: Column) -> Option<&mut Selection> {
        match column {
            Column::Brand => Some(&mut self.brands),
            Column::Transmission => Some(&mut self.transmissions),
            Column::DriveSystem => Some(&mut self.drives),
            Column::EngineType => Some(&mut self.engines),
            _ => None,
        }
    }

    /// Whether `record` satisfies every field predicate at once.
    pub fn matches(&self, dataset: &CarDataset, record: &CarRecord) -> bool {
        let year_ok = match &self.years {
            None => true,
            Some(range) => record.year.value().is_some_and(|y| range.contains(&y)),
        };
        year_ok
            && Column::CATEGORICAL.iter().all(|&col| {
                self.selection(col)
                    .map_or(true, |sel| sel.admits(record.text(col), dataset.domain(col)))
            })
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// Records of a dataset that passed a [`FilterCriteria`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a CarDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a CarDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a CarDataset {
        self.dataset
    }

    /// Indices into [`CarDataset::records`], ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CarRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the view of records that pass all active filters.
pub fn apply_filters<'a>(dataset: &'a CarDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(dataset, rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn car(brand: &str, year: i64, trans: &str, drive: &str, engine: &str, rating: f64) -> CarRecord {
        CarRecord {
            year: CellValue::Present(year),
            transmission: Some(trans.into()),
            drive_system: Some(drive.into()),
            engine_type: Some(engine.into()),
            rating: CellValue::Present(rating),
            ..CarRecord::new(brand, format!("{brand}-{year}"))
        }
    }

    fn sample() -> CarDataset {
        CarDataset::from_records(vec![
            car("BrandA", 2020, "Auto", "AWD", "V8", 8.0),
            car("BrandA", 2021, "Manual", "RWD", "V6", 7.0),
            car("BrandB", 2020, "Auto", "AWD", "V8", 9.0),
        ])
    }

    #[test]
    fn default_criteria_match_everything() {
        let ds = sample();
        let view = apply_filters(&ds, &FilterCriteria::default());
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn brand_and_year_filter() {
        let ds = sample();
        let criteria = FilterCriteria {
            brands: Selection::only(["BrandA"]),
            years: Some(2020..=2025),
            ..Default::default()
        };
        let view = apply_filters(&ds, &criteria);
        assert_eq!(view.indices(), &[0, 1]);
        assert!(view.iter().all(|r| r.brand == "BrandA"));
    }

    #[test]
    fn any_empty_selection_empties_the_view() {
        let ds = sample();
        for col in Column::CATEGORICAL {
            let mut criteria = FilterCriteria::select_all(&ds, None);
            *criteria.selection_mut(col).unwrap() = Selection::none();
            assert!(apply_filters(&ds, &criteria).is_empty(), "{col}");
        }
    }

    #[test]
    fn inverted_year_range_matches_nothing() {
        let ds = sample();
        let criteria = FilterCriteria {
            years: Some(2025..=2020),
            ..Default::default()
        };
        assert!(apply_filters(&ds, &criteria).is_empty());
    }

    #[test]
    fn unknown_values_match_nothing() {
        let ds = sample();
        let criteria = FilterCriteria {
            drives: Selection::only(["FWD"]),
            ..Default::default()
        };
        assert!(apply_filters(&ds, &criteria).is_empty());
    }

    #[test]
    fn missing_values_pass_only_full_selections() {
        let mut no_drive = car("BrandC", 2022, "Auto", "AWD", "V8", 6.0);
        no_drive.drive_system = None;
        let ds = CarDataset::from_records(vec![car("BrandA", 2020, "Auto", "AWD", "V8", 8.0), no_drive]);

        let full = FilterCriteria::select_all(&ds, None);
        assert_eq!(apply_filters(&ds, &full).len(), 2);

        let partial = FilterCriteria {
            drives: Selection::only(["AWD", "RWD"]),
            ..Default::default()
        };
        // ["AWD", "RWD"] covers the dataset's drive domain {AWD}, so it is a full set.
        assert_eq!(apply_filters(&ds, &partial).len(), 2);

        let narrower = FilterCriteria {
            brands: Selection::only(["BrandC"]),
            drives: Selection::only(["RWD"]),
            ..Default::default()
        };
        assert!(apply_filters(&ds, &narrower).is_empty());
    }

    #[test]
    fn blank_column_does_not_hide_or_admit_everything() {
        let mut a = car("BrandA", 2020, "Auto", "AWD", "V8", 8.0);
        let mut b = car("BrandB", 2021, "Manual", "RWD", "V6", 7.0);
        a.drive_system = None;
        b.drive_system = None;
        let ds = CarDataset::from_records(vec![a, b]);
        assert!(ds.domain(Column::DriveSystem).is_some_and(|d| d.is_empty()));

        let fresh = FilterCriteria::select_all(&ds, Some(1970..=2025));
        assert_eq!(fresh.drives, Selection::All);
        assert_eq!(apply_filters(&ds, &fresh).len(), 2);

        let unknown = FilterCriteria {
            drives: Selection::only(["FWD"]),
            ..Default::default()
        };
        assert!(apply_filters(&ds, &unknown).is_empty());
    }

    #[test]
    fn year_range_excludes_missing_and_invalid_years() {
        let mut missing = car("BrandA", 0, "Auto", "AWD", "V8", 8.0);
        missing.year = CellValue::Missing;
        let mut invalid = car("BrandA", 0, "Auto", "AWD", "V8", 8.0);
        invalid.year = CellValue::Invalid("soon".into());
        let ds = CarDataset::from_records(vec![missing, invalid, car("BrandA", 1999, "Auto", "AWD", "V8", 8.0)]);

        let ranged = FilterCriteria {
            years: Some(1970..=2025),
            ..Default::default()
        };
        assert_eq!(apply_filters(&ds, &ranged).indices(), &[2]);
        assert_eq!(apply_filters(&ds, &FilterCriteria::default()).len(), 3);
    }

    #[test]
    fn toggle_expands_all_into_explicit_set() {
        let ds = sample();
        let domain = ds.domain(Column::Brand).unwrap();
        let mut sel = Selection::All;
        sel.toggle("BrandB", domain);
        assert_eq!(sel, Selection::only(["BrandA"]));
        assert_eq!(sel.count_in(domain), 1);
        sel.toggle("BrandB", domain);
        assert_eq!(sel.count_in(domain), 2);
    }
}

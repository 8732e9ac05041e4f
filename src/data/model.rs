use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::classify::{classify_engine, classify_transmission};
use super::error::QueryError;

// ---------------------------------------------------------------------------
// CellValue – tri-state content of a typed cell
// ---------------------------------------------------------------------------

/// The content of a numeric (or year) cell.
///
/// `Invalid` keeps the raw text so it can be shown in the table, but every
/// filter and aggregation path treats it exactly like `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<T> {
    Present(T),
    Missing,
    Invalid(String),
}

impl<T: Copy> CellValue<T> {
    /// The value if present, `None` for missing and invalid cells.
    pub fn value(&self) -> Option<T> {
        match self {
            CellValue::Present(v) => Some(*v),
            CellValue::Missing | CellValue::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, CellValue::Invalid(_))
    }

    pub fn map<U>(&self, f: impl FnOnce(T) -> U) -> CellValue<U> {
        match self {
            CellValue::Present(v) => CellValue::Present(f(*v)),
            CellValue::Missing => CellValue::Missing,
            CellValue::Invalid(raw) => CellValue::Invalid(raw.clone()),
        }
    }
}

impl<T> Default for CellValue<T> {
    fn default() -> Self {
        CellValue::Missing
    }
}

impl<T: fmt::Display> fmt::Display for CellValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Present(v) => write!(f, "{v}"),
            CellValue::Missing => Ok(()),
            CellValue::Invalid(raw) => write!(f, "{raw}?"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the addressable schema
// ---------------------------------------------------------------------------

/// Every column a query can reference: the fifteen CSV columns plus the two
/// derived classification columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Brand,
    Model,
    Year,
    Transmission,
    DriveSystem,
    EngineType,
    Rating,
    Horsepower,
    Torque,
    Length,
    Height,
    WidthWithMirrors,
    WidthWithoutMirrors,
    CurbWeight,
    CargoCapacity,
    EngineClass,
    TransmissionClass,
}

impl Column {
    /// Columns read from the CSV, in table display order.
    pub const SOURCE: [Column; 15] = [
        Column::Brand,
        Column::Model,
        Column::Year,
        Column::Transmission,
        Column::DriveSystem,
        Column::EngineType,
        Column::Rating,
        Column::Horsepower,
        Column::Torque,
        Column::Length,
        Column::Height,
        Column::WidthWithMirrors,
        Column::WidthWithoutMirrors,
        Column::CurbWeight,
        Column::CargoCapacity,
    ];

    /// Free-text categorical columns that the sidebar filters on.
    pub const CATEGORICAL: [Column; 4] = [
        Column::Brand,
        Column::Transmission,
        Column::DriveSystem,
        Column::EngineType,
    ];

    /// The float measurement columns averaged per model.
    pub const MEASUREMENTS: [Column; 9] = [
        Column::Rating,
        Column::Horsepower,
        Column::Torque,
        Column::Length,
        Column::Height,
        Column::WidthWithMirrors,
        Column::WidthWithoutMirrors,
        Column::CurbWeight,
        Column::CargoCapacity,
    ];

    /// Header text in the CSV (or the derived column's name).
    pub fn name(self) -> &'static str {
        match self {
            Column::Brand => "car brand",
            Column::Model => "car model",
            Column::Year => "manufacturing year",
            Column::Transmission => "transmission",
            Column::DriveSystem => "drive_system",
            Column::EngineType => "engine_type",
            Column::Rating => "rating",
            Column::Horsepower => "horsepower",
            Column::Torque => "torque",
            Column::Length => "length",
            Column::Height => "height",
            Column::WidthWithMirrors => "overall width with mirrors",
            Column::WidthWithoutMirrors => "overall width without mirrors",
            Column::CurbWeight => "curb weight",
            Column::CargoCapacity => "cargo capacity, all seats In place",
            Column::EngineClass => "engine class",
            Column::TransmissionClass => "transmission class",
        }
    }

    /// Whether the column can partition rows in an aggregation.
    pub fn is_groupable(self) -> bool {
        matches!(
            self,
            Column::Brand
                | Column::Model
                | Column::Year
                | Column::Transmission
                | Column::DriveSystem
                | Column::EngineType
                | Column::EngineClass
                | Column::TransmissionClass
        )
    }

    /// Whether the column can be fed to a reducer.
    pub fn is_numeric(self) -> bool {
        self == Column::Year || Column::MEASUREMENTS.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::SOURCE
            .iter()
            .chain([Column::EngineClass, Column::TransmissionClass].iter())
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| QueryError::UnknownColumn(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// KeyValue – one group-key cell
// ---------------------------------------------------------------------------

/// A group-key value. Ordered so grouped output is deterministic:
/// missing keys sort first, then integers, then text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Missing,
    Integer(i64),
    Text(String),
}

impl KeyValue {
    pub fn text(s: impl Into<String>) -> Self {
        KeyValue::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            KeyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Missing => write!(f, "<missing>"),
            KeyValue::Integer(i) => write!(f, "{i}"),
            KeyValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CarRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single car listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarRecord {
    pub brand: String,
    pub model: String,
    pub year: CellValue<i64>,
    pub transmission: Option<String>,
    pub drive_system: Option<String>,
    pub engine_type: Option<String>,
    pub rating: CellValue<f64>,
    pub horsepower: CellValue<f64>,
    pub torque: CellValue<f64>,
    pub length: CellValue<f64>,
    pub height: CellValue<f64>,
    pub width_with_mirrors: CellValue<f64>,
    pub width_without_mirrors: CellValue<f64>,
    pub curb_weight: CellValue<f64>,
    pub cargo_capacity: CellValue<f64>,
}

impl CarRecord {
    /// A record with the given identity and every other cell missing.
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Text of a categorical column, `None` when missing or not categorical.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Brand => Some(&self.brand),
            Column::Model => Some(&self.model),
            Column::Transmission => self.transmission.as_deref(),
            Column::DriveSystem => self.drive_system.as_deref(),
            Column::EngineType => self.engine_type.as_deref(),
            _ => None,
        }
    }

    /// Group-key value of `column` for this record.
    pub fn key(&self, column: Column) -> Result<KeyValue, QueryError> {
        let key = match column {
            Column::Year => self.year.value().map_or(KeyValue::Missing, KeyValue::Integer),
            Column::EngineClass => {
                KeyValue::text(classify_engine(self.engine_type.as_deref().unwrap_or("")).as_str())
            }
            Column::TransmissionClass => KeyValue::text(
                classify_transmission(self.transmission.as_deref().unwrap_or("")).as_str(),
            ),
            c if c.is_groupable() => self.text(c).map_or(KeyValue::Missing, KeyValue::text),
            c => return Err(QueryError::NotGroupable(c)),
        };
        Ok(key)
    }

    /// Numeric cell of `column` for this record.
    pub fn number(&self, column: Column) -> Result<CellValue<f64>, QueryError> {
        let cell = match column {
            Column::Year => self.year.map(|y| y as f64),
            Column::Rating => self.rating.clone(),
            Column::Horsepower => self.horsepower.clone(),
            Column::Torque => self.torque.clone(),
            Column::Length => self.length.clone(),
            Column::Height => self.height.clone(),
            Column::WidthWithMirrors => self.width_with_mirrors.clone(),
            Column::WidthWithoutMirrors => self.width_without_mirrors.clone(),
            Column::CurbWeight => self.curb_weight.clone(),
            Column::CargoCapacity => self.cargo_capacity.clone(),
            c => return Err(QueryError::NotNumeric(c)),
        };
        Ok(cell)
    }

    /// Display text of any source column, for the data table.
    pub fn display(&self, column: Column) -> String {
        if let Some(text) = self.text(column) {
            return text.to_string();
        }
        match column {
            Column::Year => self.year.to_string(),
            Column::EngineClass | Column::TransmissionClass => {
                self.key(column).map(|k| k.to_string()).unwrap_or_default()
            }
            c => self.number(c).map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// CarDataset – the immutable store
// ---------------------------------------------------------------------------

/// The loaded table together with the distinct values of each categorical
/// column. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CarDataset {
    records: Vec<CarRecord>,
    domains: BTreeMap<Column, BTreeSet<String>>,
}

impl CarDataset {
    /// Build column domains from the loaded records.
    pub fn from_records(records: Vec<CarRecord>) -> Self {
        let mut domains: BTreeMap<Column, BTreeSet<String>> = Column::CATEGORICAL
            .iter()
            .map(|&c| (c, BTreeSet::new()))
            .collect();

        for rec in &records {
            for (&col, values) in domains.iter_mut() {
                if let Some(v) = rec.text(col) {
                    values.insert(v.to_string());
                }
            }
        }

        CarDataset { records, domains }
    }

    pub fn records(&self) -> &[CarRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CarRecord> {
        self.records.get(index)
    }

    /// Distinct non-missing values of a categorical column.
    pub fn domain(&self, column: Column) -> Option<&BTreeSet<String>> {
        self.domains.get(&column)
    }

    /// Smallest and largest present manufacturing year.
    pub fn year_span(&self) -> Option<(i64, i64)> {
        let mut years = self.records.iter().filter_map(|r| r.year.value());
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

use std::io;
use std::path::Path;

use super::error::DataLoadError;
use super::model::{CarDataset, CarRecord, CellValue, Column};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the car listings from a `.csv` file.
pub fn load_file(path: &Path) -> Result<CarDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        return Err(DataLoadError::UnsupportedFormat { extension: ext });
    }

    let reader = csv::Reader::from_path(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_records(reader)?;
    match dataset.year_span() {
        Some((first, last)) => log::info!(
            "Loaded {} cars ({first}-{last}) from {}",
            dataset.len(),
            path.display()
        ),
        None => log::info!("Loaded {} cars from {}", dataset.len(), path.display()),
    }
    Ok(dataset)
}

/// Load car listings from any CSV byte stream (header row first).
pub fn load_reader<R: io::Read>(input: R) -> Result<CarDataset, DataLoadError> {
    load_records(csv::Reader::from_reader(input))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Position of each source column in the header row, in [`Column::SOURCE`] order.
struct HeaderMap([usize; 15]);

impl HeaderMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataLoadError> {
        let mut positions = [0usize; 15];
        let mut missing = Vec::new();
        for (slot, col) in positions.iter_mut().zip(Column::SOURCE) {
            match headers.iter().position(|h| h.trim() == col.name()) {
                Some(idx) => *slot = idx,
                None => missing.push(col.name().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing));
        }
        Ok(HeaderMap(positions))
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: Column) -> &'r str {
        let slot = Column::SOURCE
            .iter()
            .position(|&c| c == column)
            .map(|i| self.0[i]);
        slot.and_then(|idx| record.get(idx)).unwrap_or("").trim()
    }
}

fn load_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<CarDataset, DataLoadError> {
    let headers = reader.headers().map_err(DataLoadError::Header)?.clone();
    let map = HeaderMap::resolve(&headers)?;

    let mut records = Vec::new();
    let mut invalid_cells = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let line = row_no + 2;
        let row = result.map_err(|source| DataLoadError::Row { line, source })?;
        let rec = parse_record(&map, &row, line)?;
        invalid_cells += Column::SOURCE
            .iter()
            .filter(|&&c| c.is_numeric())
            .filter(|&&c| rec.number(c).is_ok_and(|v| v.is_invalid()))
            .count();
        records.push(rec);
    }

    if invalid_cells > 0 {
        log::warn!("{invalid_cells} numeric cells could not be parsed and are treated as missing");
    }
    Ok(CarDataset::from_records(records))
}

fn parse_record(map: &HeaderMap, row: &csv::StringRecord, line: usize) -> Result<CarRecord, DataLoadError> {
    let required = |column| {
        let text = map.cell(row, column);
        if text.is_empty() {
            Err(DataLoadError::EmptyField { line, column })
        } else {
            Ok(text.to_string())
        }
    };
    let optional = |column| Some(map.cell(row, column)).filter(|s| !s.is_empty()).map(String::from);
    let number = |column| parse_float(map.cell(row, column));

    Ok(CarRecord {
        brand: required(Column::Brand)?,
        model: required(Column::Model)?,
        year: parse_year(map.cell(row, Column::Year)),
        transmission: optional(Column::Transmission),
        drive_system: optional(Column::DriveSystem),
        engine_type: optional(Column::EngineType),
        rating: number(Column::Rating),
        horsepower: number(Column::Horsepower),
        torque: number(Column::Torque),
        length: number(Column::Length),
        height: number(Column::Height),
        width_with_mirrors: number(Column::WidthWithMirrors),
        width_without_mirrors: number(Column::WidthWithoutMirrors),
        curb_weight: number(Column::CurbWeight),
        cargo_capacity: number(Column::CargoCapacity),
    })
}

fn is_missing_token(s: &str) -> bool {
    s.is_empty() || ["nan", "na", "n/a", "null", "none"].iter().any(|t| s.eq_ignore_ascii_case(t))
}

/// Parse a float cell. Non-finite values count as missing.
fn parse_float(s: &str) -> CellValue<f64> {
    if is_missing_token(s) {
        return CellValue::Missing;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Present(v),
        Ok(_) => CellValue::Missing,
        Err(_) => CellValue::Invalid(s.to_string()),
    }
}

/// Parse a year cell. Integral floats ("2020.0") are accepted.
fn parse_year(s: &str) -> CellValue<i64> {
    if let Ok(y) = s.parse::<i64>() {
        return CellValue::Present(y);
    }
    match parse_float(s) {
        CellValue::Present(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => CellValue::Present(f as i64),
        CellValue::Present(_) => CellValue::Invalid(s.to_string()),
        other => other.map(|f| f as i64),
    }
}

use std::io::Write;

use car_insight::data::aggregate::{aggregate, aggregate_by_name, Reducer};
use car_insight::data::error::{DataLoadError, QueryError};
use car_insight::data::filter::{apply_filters, FilterCriteria, Selection};
use car_insight::data::insights::{InsightSettings, Insights};
use car_insight::data::loader::{load_file, load_reader};
use car_insight::data::model::{CarDataset, Column, KeyValue};

const CARS: &str = "\
car brand,car model,manufacturing year,transmission,drive_system,engine_type,rating,horsepower,torque,length,height,overall width with mirrors,overall width without mirrors,curb weight,\"cargo capacity, all seats In place\"
BrandA,A1,2020,Auto,AWD,V8,8.0,400,380,190,55,84,78,4000,400
BrandA,A2,2021,Manual,RWD,V6,7.0,300,290,180,54,82,76,3500,350
BrandB,B1,2020,Auto,AWD,V8,9.0,450,420,195,56,85,79,4200,
";

fn dataset() -> CarDataset {
    load_reader(CARS.as_bytes()).expect("fixture loads")
}

#[test]
fn filter_then_aggregate_scenario() {
    let ds = dataset();
    let criteria = FilterCriteria {
        brands: Selection::only(["BrandA"]),
        years: Some(2020..=2025),
        ..Default::default()
    };
    let view = apply_filters(&ds, &criteria);
    assert_eq!(view.indices(), &[0, 1]);

    let table = aggregate(&view, &[Column::Brand], &[Column::Rating], Reducer::Mean).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].keys, vec![KeyValue::text("BrandA")]);
    assert_eq!(table.rows()[0].values, vec![Some(7.5)]);
}

#[test]
fn filtered_view_is_a_subset_satisfying_every_predicate() {
    let ds = dataset();
    let selections = [
        Selection::All,
        Selection::only(["BrandA"]),
        Selection::only(["Auto", "AWD", "V8", "BrandB"]),
        Selection::only(["unknown"]),
    ];
    for brands in &selections {
        for engines in &selections {
            for years in [None, Some(2020..=2020), Some(2021..=2030)] {
                let criteria = FilterCriteria {
                    brands: brands.clone(),
                    engines: engines.clone(),
                    years: years.clone(),
                    ..Default::default()
                };
                let view = apply_filters(&ds, &criteria);
                assert!(view.indices().iter().all(|&i| i < ds.len()));
                for car in view.iter() {
                    assert!(brands.contains(&car.brand));
                    assert!(engines.contains(car.engine_type.as_deref().unwrap_or("")));
                    if let Some(range) = &years {
                        assert!(car.year.value().is_some_and(|y| range.contains(&y)));
                    }
                }
            }
        }
    }
}

#[test]
fn empty_selection_always_empties() {
    let ds = dataset();
    let criteria = FilterCriteria {
        transmissions: Selection::none(),
        ..FilterCriteria::select_all(&ds, None)
    };
    assert!(apply_filters(&ds, &criteria).is_empty());
}

#[test]
fn blank_drive_column_keeps_a_fresh_dashboard_populated() {
    let header = CARS.lines().next().unwrap();
    let text = format!(
        "{header}\nBrandA,A1,2020,Auto,,V8,8.0,400,380,190,55,84,78,4000,400\nBrandB,B1,2021,Manual,,V6,7.0,300,290,180,54,82,76,3500,350\n"
    );
    let ds = load_reader(text.as_bytes()).unwrap();

    let fresh = FilterCriteria::select_all(&ds, Some(1970..=2025));
    assert_eq!(apply_filters(&ds, &fresh).len(), 2);

    let fwd_only = FilterCriteria {
        drives: Selection::only(["FWD"]),
        ..fresh
    };
    assert!(apply_filters(&ds, &fwd_only).is_empty());
}

#[test]
fn all_missing_group_yields_missing_value() {
    let ds = dataset();
    let view = apply_filters(&ds, &FilterCriteria::default());
    let table = aggregate_by_name(
        &view,
        &["car brand"],
        &["cargo capacity, all seats In place"],
        Reducer::Mean,
    )
    .unwrap();
    assert_eq!(table.value(&[KeyValue::text("BrandB")], Column::CargoCapacity), Ok(None));
    assert_eq!(table.value(&[KeyValue::text("BrandA")], Column::CargoCapacity), Ok(Some(375.0)));
}

#[test]
fn invalid_query_leaves_nothing_behind() {
    let ds = dataset();
    let view = apply_filters(&ds, &FilterCriteria::default());
    assert_eq!(
        aggregate_by_name(&view, &["car make"], &["rating"], Reducer::Mean),
        Err(QueryError::UnknownColumn("car make".into()))
    );
    // The store is untouched and still queryable.
    assert_eq!(ds.len(), 3);
    assert!(Insights::compute(&view, &InsightSettings::default()).is_ok());
}

#[test]
fn loads_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(CARS.as_bytes()).unwrap();
    file.flush().unwrap();

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.year_span(), Some((2020, 2021)));
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DataLoadError::Open { .. }));
}

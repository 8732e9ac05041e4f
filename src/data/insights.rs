use std::ops::RangeInclusive;

use super::aggregate::{aggregate, AggregateTable, Reducer, SortOrder};
use super::error::QueryError;
use super::filter::FilteredView;
use super::model::{Column, KeyValue};
use super::spread::{spread, SpreadRow};
use super::summary::{summarize, Summary};

/// Knobs for the derived tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightSettings {
    /// How many models the top-rated ranking keeps.
    pub top_models: usize,
    /// Years shown in the rating trend.
    pub trend_years: RangeInclusive<i64>,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            top_models: 10,
            trend_years: 2000..=2025,
        }
    }
}

/// Every derived table the dashboard renders for one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub summary: Summary,
    /// Mean of every measurement per (brand, model).
    pub model_aspects: AggregateTable,
    /// Mean of the per-model mean ratings per brand, best first.
    pub brand_ranking: AggregateTable,
    /// Mean rating per model, best first, truncated.
    pub top_models: AggregateTable,
    /// Mean rating per engine class.
    pub engine_ratings: AggregateTable,
    pub transmission_spread: Vec<SpreadRow>,
    pub drive_spread: Vec<SpreadRow>,
    /// Mean rating per (year, brand) inside the trend window.
    pub yearly_trend: AggregateTable,
}

impl Insights {
    /// Compute everything or nothing.
    pub fn compute(view: &FilteredView<'_>, settings: &InsightSettings) -> Result<Insights, QueryError> {
        let model_aspects = aggregate(view, &[Column::Brand, Column::Model], &Column::MEASUREMENTS, Reducer::Mean)?;

        let brand_ranking = model_aspects
            .rollup(&[Column::Brand], Reducer::Mean)?
            .sorted_by(Column::Rating, SortOrder::Descending)?;

        let top_models = aggregate(view, &[Column::Model], &[Column::Rating], Reducer::Mean)?
            .sorted_by(Column::Rating, SortOrder::Descending)?
            .top(settings.top_models);

        let engine_ratings = aggregate(view, &[Column::EngineClass], &[Column::Rating], Reducer::Mean)?;

        let yearly_trend = aggregate(view, &[Column::Year, Column::Brand], &[Column::Rating], Reducer::Mean)?
            .retain_keys(Column::Year, |k| {
                k.as_i64().is_some_and(|y| settings.trend_years.contains(&y))
            })?;

        // Cars without a drive system get no box of their own.
        let mut drive_spread = spread(view, Column::DriveSystem, Column::Rating)?;
        drive_spread.retain(|row| row.key != KeyValue::Missing);

        Ok(Insights {
            summary: summarize(view),
            model_aspects,
            brand_ranking,
            top_models,
            engine_ratings,
            transmission_spread: spread(view, Column::TransmissionClass, Column::Rating)?,
            drive_spread,
            yearly_trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CarDataset, CarRecord, CellValue, KeyValue};

    fn car(brand: &str, model: &str, year: i64, engine: &str, rating: f64) -> CarRecord {
        CarRecord {
            year: CellValue::Present(year),
            engine_type: Some(engine.into()),
            transmission: Some("8-speed automatic".into()),
            rating: CellValue::Present(rating),
            ..CarRecord::new(brand, model)
        }
    }

    #[test]
    fn insights_over_small_fleet() {
        let ds = CarDataset::from_records(vec![
            car("Ford", "Mustang", 1998, "V8", 6.0),
            car("Ford", "Mustang", 2018, "V8", 8.0),
            car("Ford", "Focus", 2018, "Inline 4", 4.0),
            car("Honda", "Civic", 2019, "Inline 4", 8.0),
        ]);
        let settings = InsightSettings {
            top_models: 2,
            ..Default::default()
        };
        let insights = Insights::compute(&FilteredView::all(&ds), &settings).unwrap();

        assert_eq!(insights.summary.count, 4);
        assert_eq!(insights.model_aspects.len(), 3);

        // Ford = mean(Mustang 7.0, Focus 4.0) = 5.5, so Honda ranks first.
        let brands: Vec<_> = insights.brand_ranking.rows().iter().map(|r| r.keys[0].clone()).collect();
        assert_eq!(brands, [KeyValue::text("Honda"), KeyValue::text("Ford")]);
        assert_eq!(insights.brand_ranking.value(&[KeyValue::text("Ford")], Column::Rating), Ok(Some(5.5)));

        assert_eq!(insights.top_models.len(), 2);
        assert_eq!(insights.top_models.rows()[0].keys[0], KeyValue::text("Civic"));

        assert_eq!(
            insights.engine_ratings.value(&[KeyValue::text("Inline 4")], Column::Rating),
            Ok(Some(6.0))
        );
        assert_eq!(insights.transmission_spread.len(), 1);
        assert_eq!(insights.transmission_spread[0].key, KeyValue::text("Automatic"));

        // 1998 falls outside the default 2000..=2025 trend window.
        assert_eq!(insights.yearly_trend.len(), 2);
    }

    #[test]
    fn drive_spread_skips_cars_without_a_drive_system() {
        let mut awd = car("Subaru", "Outback", 2020, "Flat 4", 7.5);
        awd.drive_system = Some("AWD".into());
        let ds = CarDataset::from_records(vec![awd, car("Ford", "Focus", 2018, "Inline 4", 4.0)]);
        let insights = Insights::compute(&FilteredView::all(&ds), &InsightSettings::default()).unwrap();

        assert_eq!(insights.drive_spread.len(), 1);
        assert_eq!(insights.drive_spread[0].key, KeyValue::text("AWD"));
        assert_eq!(insights.drive_spread[0].spread.map(|s| s.count), Some(1));
    }
}

use super::aggregate::Reducer;
use super::filter::FilteredView;
use super::model::CarRecord;

/// Headline metrics shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub mean_rating: Option<f64>,
    pub mean_horsepower: Option<f64>,
    pub count: usize,
}

/// Compute the headline metrics of a view.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    Summary {
        mean_rating: mean_of(view, |r| r.rating.value()),
        mean_horsepower: mean_of(view, |r| r.horsepower.value()),
        count: view.len(),
    }
}

fn mean_of(view: &FilteredView<'_>, pick: impl Fn(&CarRecord) -> Option<f64>) -> Option<f64> {
    let values: Vec<f64> = view.iter().filter_map(pick).collect();
    Reducer::Mean.reduce(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CarDataset, CellValue};

    #[test]
    fn summary_over_view() {
        let mut a = CarRecord::new("Mazda", "MX-5");
        a.rating = CellValue::Present(9.0);
        a.horsepower = CellValue::Present(181.0);
        let mut b = CarRecord::new("Mazda", "CX-5");
        b.rating = CellValue::Present(7.0);
        b.horsepower = CellValue::Invalid("n/a hp".into());
        let ds = CarDataset::from_records(vec![a, b]);

        let s = summarize(&FilteredView::all(&ds));
        assert_eq!(s.mean_rating, Some(8.0));
        assert_eq!(s.mean_horsepower, Some(181.0));
        assert_eq!(s.count, 2);
    }

    #[test]
    fn empty_view_has_no_means() {
        let ds = CarDataset::default();
        assert_eq!(summarize(&FilteredView::all(&ds)), Summary::default());
    }
}

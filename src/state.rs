use std::collections::BTreeSet;
use std::path::Path;

use car_insight::config::AppConfig;
use car_insight::data::filter::{apply_filters, FilterCriteria, Selection};
use car_insight::data::insights::Insights;
use car_insight::data::loader::load_file;
use car_insight::data::model::{CarDataset, Column};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<CarDataset>,

    /// Sidebar filter selections.
    pub criteria: FilterCriteria,

    /// Indices of cars passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Derived tables for the current filters.
    pub insights: Option<Insights>,

    /// Brand → colour for the per-brand charts.
    pub brand_colors: Option<ColorMap>,

    /// Startup load failure; blocks the dashboard until a file loads.
    pub load_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            insights: None,
            brand_colors: None,
            load_error: None,
            status_message: None,
        }
    }

    /// Load the configured CSV. A failure is kept as the blocking message.
    pub fn load_initial(&mut self) {
        let path = self.config.data_path.clone();
        if let Err(msg) = self.load_path(&path) {
            self.load_error = Some(msg);
        }
    }

    /// Replace the dataset with the contents of `path`.
    pub fn load_path(&mut self, path: &Path) -> Result<(), String> {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load {}: {e:#}", path.display());
                let msg = format!("Error loading {}: {e:#}", path.display());
                self.status_message = Some(msg.clone());
                Err(msg)
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: CarDataset) {
        let (lo, hi) = self.config.year_bounds;
        self.criteria = FilterCriteria::select_all(&dataset, Some(lo..=hi));
        self.brand_colors = dataset.domain(Column::Brand).map(ColorMap::new);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the visible rows and every derived table after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = apply_filters(ds, &self.criteria);
        match Insights::compute(&view, &self.config.insight_settings()) {
            Ok(insights) => {
                log::debug!("{} of {} cars pass the filters", view.len(), ds.len());
                self.insights = Some(insights);
                self.visible_indices = view.into_indices();
            }
            Err(e) => {
                log::error!("Failed to compute insights: {e}");
                self.status_message = Some(format!("Query error: {e}"));
            }
        }
    }

    fn domain(&self, column: Column) -> BTreeSet<String> {
        self.dataset
            .as_ref()
            .and_then(|ds| ds.domain(column))
            .cloned()
            .unwrap_or_default()
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: Column, value: &str) {
        let domain = self.domain(column);
        if let Some(sel) = self.criteria.selection_mut(column) {
            sel.toggle(value, &domain);
            self.refilter();
        }
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: Column) {
        let domain = self.domain(column);
        if let Some(sel) = self.criteria.selection_mut(column) {
            *sel = Selection::everything(&domain);
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: Column) {
        if let Some(sel) = self.criteria.selection_mut(column) {
            *sel = Selection::none();
            self.refilter();
        }
    }

    /// Set the inclusive year range, keeping `min <= max`.
    pub fn set_year_range(&mut self, min: i64, max: i64) {
        let range = min.min(max)..=max.max(min);
        if self.criteria.years.as_ref() != Some(&range) {
            self.criteria.years = Some(range);
            self.refilter();
        }
    }
}

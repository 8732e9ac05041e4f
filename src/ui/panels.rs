use std::collections::BTreeSet;

use car_insight::data::model::Column;
use car_insight::data::summary::Summary;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ACCENT;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn filter_label(column: Column) -> &'static str {
    match column {
        Column::Brand => "Brand",
        Column::Transmission => "Transmission",
        Column::DriveSystem => "Drive System",
        Column::EngineType => "Engine Type",
        other => other.name(),
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("Filter Your Data").color(ACCENT));
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let domains: Vec<(Column, BTreeSet<String>)> = Column::CATEGORICAL
        .iter()
        .map(|&col| (col, dataset.domain(col).cloned().unwrap_or_default()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range(ui, state);
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for (col, values) in &domains {
                let n_total = values.len();
                let n_selected = state
                    .criteria
                    .selection(*col)
                    .map_or(n_total, |sel| sel.count_in(values));
                let header_text = format!("{}  ({n_selected}/{n_total})", filter_label(*col));

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.name())
                    .default_open(*col == Column::Brand)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(*col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(*col);
                            }
                        });

                        for val in values {
                            let mut checked = state.criteria.selection(*col).is_some_and(|s| s.contains(val));
                            let mut text = RichText::new(val);
                            if *col == Column::Brand {
                                if let Some(cm) = &state.brand_colors {
                                    text = text.color(cm.color_for(val));
                                }
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(*col, val);
                            }
                        }
                    });
            }
        });
}

fn year_range(ui: &mut Ui, state: &mut AppState) {
    let (lo_bound, hi_bound) = state.config.year_bounds;
    let (mut lo, mut hi) = state
        .criteria
        .years
        .as_ref()
        .map_or((lo_bound, hi_bound), |r| (*r.start(), *r.end()));

    ui.strong("Year Range");
    let from = ui.add(egui::Slider::new(&mut lo, lo_bound..=hi_bound).text("from"));
    let to = ui.add(egui::Slider::new(&mut hi, lo_bound..=hi_bound).text("to"));
    if from.changed() || to.changed() {
        state.set_year_range(lo, hi);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} cars loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Round to two decimals; "n/a" when there is nothing to average.
pub fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Three headline metrics side by side.
pub fn metric_cards(ui: &mut Ui, summary: &Summary) {
    let cards = [
        ("Average Rating", format_metric(summary.mean_rating)),
        ("Average Horsepower", format_metric(summary.mean_horsepower)),
        ("Total Cars", summary.count.to_string()),
    ];
    ui.columns(cards.len(), |cols| {
        for (ui, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(title).color(ACCENT));
                    ui.label(RichText::new(value).size(22.0).strong().color(ACCENT));
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open car listings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        // The error is already logged and shown in the status bar.
        let _ = state.load_path(&path);
    }
}

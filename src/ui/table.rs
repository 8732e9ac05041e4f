use car_insight::data::model::{CarDataset, Column};
use eframe::egui::{RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color::ACCENT;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filtered data table
// ---------------------------------------------------------------------------

/// Every visible car, one row each, all source columns.
pub fn filtered_table(ui: &mut Ui, dataset: &CarDataset, visible: &[usize]) {
    if visible.is_empty() {
        ui.label("No cars match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .columns(TableColumn::auto().at_least(60.0), Column::SOURCE.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for col in Column::SOURCE {
                header.col(|ui| {
                    ui.label(RichText::new(col.name()).strong().color(ACCENT));
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let Some(car) = dataset.get(visible[row.index()]) else {
                    return;
                };
                for col in Column::SOURCE {
                    row.col(|ui| {
                        ui.label(car.display(col));
                    });
                }
            });
        });
}

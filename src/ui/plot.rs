use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use car_insight::data::aggregate::AggregateTable;
use car_insight::data::model::{Column, KeyValue};
use car_insight::data::spread::SpreadRow;
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{ColorMap, ACCENT};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Shared plot helpers
// ---------------------------------------------------------------------------

fn chart(id: &str) -> Plot<'_> {
    Plot::new(id.to_owned())
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .legend(Legend::default())
}

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn categorical_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn key_label(keys: &[KeyValue]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(" / ")
}

/// Title line plus a placeholder when there is nothing to draw.
fn header(ui: &mut Ui, title: &str, empty: bool) -> bool {
    ui.strong(title);
    if empty {
        ui.label("No data for the current filters.");
    }
    !empty
}

fn brand_color(colors: Option<&ColorMap>, brand: &KeyValue) -> Color32 {
    match (colors, brand.as_str()) {
        (Some(cm), Some(b)) => cm.color_for(b),
        _ => ACCENT,
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal ranking of one value column, first row at the top.
pub fn ranking_bars(ui: &mut Ui, id: &str, title: &str, table: &AggregateTable, value: Column) {
    if !header(ui, title, table.is_empty()) {
        return;
    }
    let Ok(idx) = table.value_index(value) else {
        return;
    };

    let n = table.len();
    let mut labels = vec![String::new(); n];
    let bars: Vec<Bar> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let pos = n - 1 - i;
            labels[pos] = key_label(&row.keys);
            let v = row.values[idx]?;
            Some(Bar::new(pos as f64, v).name(&labels[pos]).fill(ACCENT))
        })
        .collect();

    chart(id)
        .x_axis_label(value.name())
        .y_axis_formatter(categorical_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7).color(ACCENT));
        });
}

/// Vertical bars of one value column per group, in table order.
pub fn category_bars(ui: &mut Ui, id: &str, title: &str, table: &AggregateTable, value: Column) {
    if !header(ui, title, table.is_empty()) {
        return;
    }
    let Ok(idx) = table.value_index(value) else {
        return;
    };

    let labels: Vec<String> = table.rows().iter().map(|r| key_label(&r.keys)).collect();
    let bars: Vec<Bar> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let v = row.values[idx]?;
            Some(Bar::new(i as f64, v).name(&labels[i]).fill(ACCENT))
        })
        .collect();

    chart(id)
        .y_axis_label(value.name())
        .x_axis_formatter(categorical_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6).color(ACCENT));
        });
}

// ---------------------------------------------------------------------------
// Scatter & line charts
// ---------------------------------------------------------------------------

/// One point per (brand, model) row, coloured by brand.
pub fn brand_scatter(
    ui: &mut Ui,
    id: &str,
    title: &str,
    table: &AggregateTable,
    x: Column,
    y: Column,
    colors: Option<&ColorMap>,
) {
    if !header(ui, title, table.is_empty()) {
        return;
    }
    let (Ok(brand_idx), Ok(xi), Ok(yi)) = (
        table.key_index(Column::Brand),
        table.value_index(x),
        table.value_index(y),
    ) else {
        return;
    };

    let mut by_brand: BTreeMap<&KeyValue, Vec<[f64; 2]>> = BTreeMap::new();
    for row in table.rows() {
        if let (Some(xv), Some(yv)) = (row.values[xi], row.values[yi]) {
            by_brand.entry(&row.keys[brand_idx]).or_default().push([xv, yv]);
        }
    }

    chart(id)
        .x_axis_label(x.name())
        .y_axis_label(y.name())
        .show(ui, |plot_ui| {
            for (brand, points) in by_brand {
                let series = Points::new(PlotPoints::from(points))
                    .name(brand.to_string())
                    .color(brand_color(colors, brand))
                    .radius(4.0);
                plot_ui.points(series);
            }
        });
}

/// Mean rating over the years, one line per brand.
pub fn yearly_lines(ui: &mut Ui, id: &str, title: &str, table: &AggregateTable, colors: Option<&ColorMap>) {
    if !header(ui, title, table.is_empty()) {
        return;
    }
    let (Ok(year_idx), Ok(brand_idx), Ok(rating_idx)) = (
        table.key_index(Column::Year),
        table.key_index(Column::Brand),
        table.value_index(Column::Rating),
    ) else {
        return;
    };

    // Rows are ordered by (year, brand), so each brand's points come out by year.
    let mut by_brand: BTreeMap<&KeyValue, Vec<[f64; 2]>> = BTreeMap::new();
    for row in table.rows() {
        if let (Some(year), Some(rating)) = (row.keys[year_idx].as_i64(), row.values[rating_idx]) {
            by_brand.entry(&row.keys[brand_idx]).or_default().push([year as f64, rating]);
        }
    }

    chart(id)
        .x_axis_label("Year")
        .y_axis_label("Average Rating")
        .show(ui, |plot_ui| {
            for (brand, points) in by_brand {
                let color = brand_color(colors, brand);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(brand.to_string())
                        .color(color)
                        .width(2.5),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// Rating distribution per category.
pub fn spread_boxes(ui: &mut Ui, id: &str, title: &str, rows: &[SpreadRow]) {
    if !header(ui, title, rows.iter().all(|r| r.spread.is_none())) {
        return;
    }

    let labels: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
    let boxes: Vec<BoxElem> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let s = row.spread?;
            let elem = BoxElem::new(
                i as f64,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(format!("{} (n={})", labels[i], s.count))
            .fill(ACCENT.gamma_multiply(0.4))
            .stroke(Stroke::new(1.5, ACCENT))
            .box_width(0.5);
            Some(elem)
        })
        .collect();

    chart(id)
        .y_axis_label("Expert Rating")
        .x_axis_formatter(categorical_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

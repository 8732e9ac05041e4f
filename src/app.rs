use car_insight::config::AppConfig;
use car_insight::data::model::Column;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ACCENT;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarInsightApp {
    pub state: AppState,
}

impl CarInsightApp {
    /// Build the app and load the configured dataset.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_initial();
        Self { state }
    }
}

impl eframe::App for CarInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Blocking load error ----
        if let Some(err) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("{err}\n\nUse File → Open… to choose another CSV."))
                            .color(Color32::RED)
                            .size(18.0),
                    );
                });
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(RichText::new(title).color(ACCENT));
    ui.separator();
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(insights)) = (&state.dataset, &state.insights) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view cars  (File → Open…)");
        });
        return;
    };
    let colors = state.brand_colors.as_ref();

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("CarInsight Analyzer").size(30.0).strong().color(ACCENT));
        ui.label("Discover car ratings, spot market trends, and gain insights interactively");
    });
    ui.add_space(8.0);
    panels::metric_cards(ui, &insights.summary);

    section(ui, "Brand-level Insights");
    ui.columns(2, |cols| {
        plot::ranking_bars(
            &mut cols[0],
            "brand_rating",
            "Average Rating by Car Brand",
            &insights.brand_ranking,
            Column::Rating,
        );
        plot::ranking_bars(
            &mut cols[1],
            "top_models",
            &format!("Top {} Cars by Average Expert Rating", state.config.top_models),
            &insights.top_models,
            Column::Rating,
        );
    });

    section(ui, "Performance vs Rating");
    ui.columns(2, |cols| {
        plot::brand_scatter(
            &mut cols[0],
            "hp_vs_rating",
            "Horsepower vs Rating",
            &insights.model_aspects,
            Column::Horsepower,
            Column::Rating,
            colors,
        );
        plot::category_bars(
            &mut cols[1],
            "engine_rating",
            "Engine Type vs Average Rating",
            &insights.engine_ratings,
            Column::Rating,
        );
    });

    section(ui, "Transmission & Drive System");
    ui.columns(2, |cols| {
        plot::spread_boxes(
            &mut cols[0],
            "transmission_box",
            "Transmission Type vs Rating",
            &insights.transmission_spread,
        );
        plot::spread_boxes(&mut cols[1], "drive_box", "Drive System vs Rating", &insights.drive_spread);
    });

    section(ui, "Size / Comfort vs Rating");
    ui.columns(2, |cols| {
        plot::brand_scatter(
            &mut cols[0],
            "cargo_vs_rating",
            "Cargo Capacity vs Rating",
            &insights.model_aspects,
            Column::CargoCapacity,
            Column::Rating,
            colors,
        );
        plot::yearly_lines(
            &mut cols[1],
            "yearly_trend",
            "Average Rating Trends by Brand Over Time",
            &insights.yearly_trend,
            colors,
        );
    });

    section(ui, "Filtered Data Table");
    table::filtered_table(ui, dataset, &state.visible_indices);
}

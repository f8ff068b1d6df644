use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LatbandApp {
    pub state: AppState,
}

impl LatbandApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LatbandApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: layers ----
        egui::SidePanel::left("layer_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: attribute table ----
        egui::TopBottomPanel::bottom("attribute_panel")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                table::attribute_table(ui, &self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::map_plot(ui, &self.state);
        });
    }
}

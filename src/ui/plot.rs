use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map (central panel)
// ---------------------------------------------------------------------------

/// Draw the last refreshed snapshot of every visible layer as points,
/// longitude on X and latitude on Y.
pub fn map_plot(ui: &mut Ui, state: &AppState) {
    if state.snapshot.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No layers to draw  (File → Add shapefile…, or Run workflow)");
        });
        return;
    }

    Plot::new("map_plot")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for layer in &state.snapshot {
                let points: PlotPoints = layer.points.iter().copied().collect();
                let markers = Points::new(points)
                    .name(&layer.name)
                    .color(Color32::from(layer.color))
                    .radius(2.5);
                plot_ui.points(markers);
            }
        });
}

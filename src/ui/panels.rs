use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – layer list
// ---------------------------------------------------------------------------

/// Render the layer list: visibility, colour swatch, feature count.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Layers");
    ui.separator();

    if state.project.is_empty() {
        ui.label("No layers loaded.");
        return;
    }

    // Collect what we draw so the state can be mutated inside the loop.
    let rows: Vec<(String, Color32, usize, bool)> = state
        .project
        .layers()
        .iter()
        .map(|l| (l.name.clone(), Color32::from(l.color()), l.feature_count(), l.is_valid()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (name, color, count, valid) in &rows {
                ui.horizontal(|ui: &mut Ui| {
                    let mut visible = state.is_visible(name);
                    if ui.checkbox(&mut visible, "").changed() {
                        state.toggle_visibility(name);
                    }

                    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, *color);

                    let mut text = RichText::new(format!("{name}  ({count})"));
                    if !valid {
                        text = text.color(Color32::RED).italics();
                    }
                    let selected = state.selected_layer.as_deref() == Some(name.as_str());
                    if ui.selectable_label(selected, text).clicked() {
                        state.selected_layer = Some(name.clone());
                    }
                    if ui.small_button("✖").on_hover_text("Remove layer").clicked() {
                        state.remove_layer(name);
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open project…").clicked() {
                open_project_dialog(state);
                ui.close_menu();
            }
            if ui.button("Add shapefile…").clicked() {
                add_shapefile_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.project.path().is_some(), egui::Button::new("Save project"))
                .clicked()
            {
                state.save_project(None);
                ui.close_menu();
            }
            if ui.button("Save project as…").clicked() {
                save_project_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let can_run = state.config.source.shapefile.is_some();
        if ui
            .add_enabled(can_run, egui::Button::new("Run workflow"))
            .on_disabled_hover_text("No source shapefile configured")
            .clicked()
        {
            state.run_workflow();
        }

        let refresh_label = if state.dirty { "Refresh •" } else { "Refresh" };
        if ui.button(refresh_label).clicked() {
            state.refresh();
        }

        ui.separator();
        ui.label(format!("{} layer(s)", state.project.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_project_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open project")
        .add_filter("Project", &["json"])
        .pick_file();
    if let Some(path) = file {
        state.open_project(&path);
    }
}

pub fn add_shapefile_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Add point shapefile")
        .add_filter("Shapefile", &["shp"])
        .pick_file();
    if let Some(path) = file {
        state.add_shapefile(&path);
    }
}

pub fn save_project_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save project as")
        .add_filter("Project", &["json"])
        .set_file_name("project.json")
        .save_file();
    if let Some(path) = file {
        state.save_project(Some(&path));
    }
}

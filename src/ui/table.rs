use std::collections::BTreeSet;

use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Attribute table (bottom panel)
// ---------------------------------------------------------------------------

/// Show the attributes of every feature of the selected layer.
pub fn attribute_table(ui: &mut Ui, state: &AppState) {
    let Some(name) = &state.selected_layer else {
        ui.label("Select a layer to see its attributes.");
        return;
    };
    let Some(layer) = state.project.layer(name) else {
        ui.label(format!("Layer '{name}' is no longer in the project."));
        return;
    };
    if let Some(err) = layer.error() {
        ui.label(format!("Layer '{name}' is invalid: {err}"));
        return;
    }

    // Union of attribute names; features of one layer normally share them.
    let columns: Vec<&str> = layer
        .features()
        .iter()
        .flat_map(|f| f.attributes.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    ui.strong(format!("{name}  ({} features)", layer.feature_count()));

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for col in &columns {
                    header.col(|ui| {
                        ui.strong(*col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, layer.feature_count(), |mut row| {
                    let idx = row.index();
                    let feature = &layer.features()[idx];
                    row.col(|ui| {
                        ui.label(idx.to_string());
                    });
                    for col in &columns {
                        row.col(|ui| {
                            let text = feature
                                .attribute(col)
                                .map(|v| v.as_text())
                                .unwrap_or_default();
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

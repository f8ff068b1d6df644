use std::collections::BTreeSet;
use std::path::Path;

use crate::color::Rgb;
use crate::config::WorkflowConfig;
use crate::session::Project;
use crate::workflow;

// ---------------------------------------------------------------------------
// Map snapshot
// ---------------------------------------------------------------------------

/// One layer as last drawn: name, colour, and its point coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnLayer {
    pub name: String,
    pub color: Rgb,
    /// `[lon, lat]` pairs.
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub project: Project,

    /// Config used by "Run workflow".
    pub config: WorkflowConfig,

    /// Names of layers the user unticked.
    pub hidden: BTreeSet<String>,

    /// Layer whose attribute table is shown.
    pub selected_layer: Option<String>,

    /// What the map currently draws. Only [`AppState::refresh`] updates it.
    pub snapshot: Vec<DrawnLayer>,

    /// Project changed since the last refresh.
    pub dirty: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(project: Project, config: WorkflowConfig) -> Self {
        let mut state = AppState {
            project,
            config,
            hidden: BTreeSet::new(),
            selected_layer: None,
            snapshot: Vec::new(),
            dirty: false,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Rebuild the map snapshot from the project.
    pub fn refresh(&mut self) {
        self.snapshot = self
            .project
            .layers()
            .iter()
            .filter(|l| !self.hidden.contains(&l.name))
            .map(|l| DrawnLayer {
                name: l.name.clone(),
                color: l.color(),
                points: l
                    .features()
                    .iter()
                    .filter_map(|f| f.geometry)
                    .map(|p| [p.x, p.y])
                    .collect(),
            })
            .collect();
        self.dirty = false;
    }

    /// Show or hide a layer. Visibility redraws at once, like any map canvas.
    pub fn toggle_visibility(&mut self, name: &str) {
        if !self.hidden.remove(name) {
            self.hidden.insert(name.to_string());
        }
        self.refresh();
    }

    /// Drop every layer called `name` from the project.
    pub fn remove_layer(&mut self, name: &str) {
        let removed = self.project.remove_layers(name);
        log::info!("removed {removed} layer(s) named '{name}'");
        self.hidden.remove(name);
        if self.selected_layer.as_deref() == Some(name) {
            self.selected_layer = None;
        }
        self.refresh();
    }

    pub fn is_visible(&self, name: &str) -> bool {
        !self.hidden.contains(name)
    }

    /// Run the workflow on the current project. Style changes wait for a refresh.
    pub fn run_workflow(&mut self) {
        match workflow::run(&mut self.project, &self.config) {
            Ok(report) => {
                let mut lines: Vec<String> = report.notices.iter().map(|n| n.to_string()).collect();
                lines.push(format!(
                    "{} exported, {} in band, {} layer(s) added (refresh to redraw)",
                    report.exported_rows, report.filtered_rows, report.layers_added
                ));
                self.status_message = Some(lines.join("\n"));
                self.selected_layer = Some(report.filtered_layer);
            }
            Err(e) => {
                log::error!("workflow failed: {e}");
                self.status_message = Some(format!("Error: {:#}", anyhow::Error::from(e)));
            }
        }
        self.dirty = true;
    }

    pub fn open_project(&mut self, path: &Path) {
        match Project::open(path) {
            Ok(project) => {
                self.project = project;
                self.hidden.clear();
                self.selected_layer = None;
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("failed to open project: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn add_shapefile(&mut self, path: &Path) {
        match self.project.add_vector_layer(path, "") {
            Ok(layer) => {
                log::info!("added {} ({} features)", layer.name, layer.feature_count());
                self.selected_layer = Some(layer.name.clone());
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("failed to add shapefile: {e}");
                self.status_message = Some(format!("Error: {:#}", anyhow::Error::from(e)));
            }
        }
    }

    pub fn save_project(&mut self, path: Option<&Path>) {
        let result = match path {
            Some(p) => self.project.save_as(p),
            None => self.project.save(),
        };
        self.status_message = match result {
            Ok(()) => None,
            Err(e) => Some(format!("Error: {e}")),
        };
    }
}

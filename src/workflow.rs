//! The airport workflow: ingest, export, filter, re-ingest, restyle.
//!
//! Every stage takes the [`Project`] explicitly, so a run is a function of
//! (project, config) and the idempotence guards can be exercised against an
//! in-memory project.

use std::fmt;
use std::path::Path;

use crate::color::Rgb;
use crate::config::WorkflowConfig;
use crate::data::export::{write_attribute_text, ExportFields};
use crate::data::filter::{filter_rows, LatitudeBand};
use crate::data::table::Table;
use crate::data::uri::DelimitedTextUri;
use crate::error::{Result, WorkflowError};
use crate::session::{layer_name_for, MapLayer, Project};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Conditions a run reports but carries on through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The source shapefile layer was already in the project.
    SourceAlreadyLoaded,
    /// The freshly built filtered layer failed to load.
    LayerNotLoaded,
    /// A layer with the filtered layer's name was already in the project.
    FilteredAlreadyCreated,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Notice::SourceAlreadyLoaded => "Airport shp file already loaded",
            Notice::LayerNotLoaded => "Layer not loaded",
            Notice::FilteredAlreadyCreated => "lowLatLayer already created",
        };
        f.write_str(msg)
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowReport {
    pub notices: Vec<Notice>,
    pub source_layer: String,
    pub filtered_layer: String,
    pub exported_rows: usize,
    pub filtered_rows: usize,
    pub layers_added: usize,
}

impl WorkflowReport {
    fn notice(&mut self, notice: Notice) {
        log::info!("notice: {notice}");
        self.notices.push(notice);
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Stage 1: add the shapefile as a layer named after its file stem, unless a
/// layer of that name is already present. Returns the layer name.
pub fn ingest_source_layer(project: &mut Project, shapefile: &Path, report: &mut WorkflowReport) -> Result<String> {
    let name = layer_name_for(shapefile);
    if project.has_layer(&name) {
        report.notice(Notice::SourceAlreadyLoaded);
    } else {
        project.add_vector_layer(shapefile, &name)?;
        report.layers_added += 1;
    }
    Ok(name)
}

/// Stage 2: dump name, code, latitude and longitude of every feature of
/// `layer_name` to `path`. Returns the number of data rows.
pub fn export_attributes(project: &Project, layer_name: &str, fields: &ExportFields, path: &Path) -> Result<usize> {
    let layer = project
        .layer(layer_name)
        .ok_or_else(|| WorkflowError::LayerNotFound(layer_name.to_string()))?;
    if !layer.is_valid() {
        log::warn!("exporting from invalid layer '{layer_name}'");
    }
    write_attribute_text(layer_name, layer.features(), fields, path)
}

/// Stage 3: read the attribute file, keep rows whose `column` lies in
/// `band`, write them to `output` separated by `delimiter`. Returns the kept
/// row count.
pub fn filter_and_export(
    input: &Path,
    column: &str,
    band: LatitudeBand,
    output: &Path,
    delimiter: u8,
) -> Result<usize> {
    let table = Table::read_csv(input)?;
    let kept = filter_rows(&table, column, band, input)?;
    kept.write_delimited(output, delimiter)?;
    log::info!(
        "kept {} of {} row(s) with {} <= {column} <= {}, wrote {}",
        kept.len(),
        table.len(),
        band.min,
        band.max,
        output.display()
    );
    Ok(kept.len())
}

/// The delimited-text source definition for the filtered file.
pub fn build_filtered_uri(config: &WorkflowConfig, path: &Path) -> Result<DelimitedTextUri> {
    let delimiter = config.delimiter().ok_or_else(|| {
        WorkflowError::Config(format!("bad delimiter '{}'", config.layer.delimiter))
    })?;
    Ok(DelimitedTextUri {
        path: path.to_path_buf(),
        encoding: config.layer.encoding.clone(),
        delimiter,
        x_field: config.layer.x_field.clone(),
        y_field: config.layer.y_field.clone(),
        crs: config.crs()?,
    })
}

/// Stage 4: load the filtered file as a layer. An invalid layer is reported
/// and still added; an existing layer of the same name is left untouched.
pub fn ingest_filtered_layer(
    project: &mut Project,
    uri: &DelimitedTextUri,
    name: &str,
    report: &mut WorkflowReport,
) {
    let layer = MapLayer::from_delimited_text(uri, name);
    if !layer.is_valid() {
        report.notice(Notice::LayerNotLoaded);
    }

    if project.has_layer(name) {
        report.notice(Notice::FilteredAlreadyCreated);
    } else {
        project.add_map_layer(layer);
        report.layers_added += 1;
    }
}

/// Stage 5: set the symbol colour of the first layer called `name`.
pub fn restyle(project: &mut Project, name: &str, color: Rgb) -> Result<()> {
    let layer = project
        .layer_mut(name)
        .ok_or_else(|| WorkflowError::LayerNotFound(name.to_string()))?;
    layer.set_color(color);
    Ok(())
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

/// Run all stages in order against `project`.
///
/// Notices never stop the run; I/O, shapefile and CSV faults do.
pub fn run(project: &mut Project, config: &WorkflowConfig) -> Result<WorkflowReport> {
    config.validate()?;
    let shapefile = config.shapefile()?;
    let mut report = WorkflowReport::default();

    let source = ingest_source_layer(project, shapefile, &mut report)?;
    restyle(project, &source, config.style.source_color)?;

    let out_dir = config.output_dir();
    if !out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&out_dir).map_err(|e| WorkflowError::io(&out_dir, e))?;
    }

    let attribute_path = config.attribute_path();
    report.exported_rows = export_attributes(project, &source, &config.export_fields(), &attribute_path)?;

    // The filtered file is written with the separator its layer reads it with.
    let filtered_path = config.filtered_path();
    let uri = build_filtered_uri(config, &filtered_path)?;
    let delimiter = u8::try_from(uri.delimiter)
        .map_err(|_| WorkflowError::Config(format!("delimiter '{}' is not ASCII", uri.delimiter)))?;
    report.filtered_rows =
        filter_and_export(&attribute_path, &config.filter.column, config.band(), &filtered_path, delimiter)?;

    ingest_filtered_layer(project, &uri, &config.layer.name, &mut report);
    restyle(project, &config.layer.name, config.style.filtered_color)?;

    report.source_layer = source;
    report.filtered_layer = config.layer.name.clone();
    log::info!(
        "workflow done: {} exported, {} filtered, {} layer(s) added, {} notice(s)",
        report.exported_rows,
        report.filtered_rows,
        report.layers_added,
        report.notices.len()
    );
    Ok(report)
}

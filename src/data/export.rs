use std::path::Path;

use super::model::Feature;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Attribute text export
// ---------------------------------------------------------------------------

/// Header of the attribute text file. Plain commas, unlike the data rows.
pub const ATTRIBUTE_HEADER: &str = "Name,Iata Code,Latitude,Longitude";

/// Column names of [`ATTRIBUTE_HEADER`], in order.
pub const NAME_COLUMN: &str = "Name";
pub const CODE_COLUMN: &str = "Iata Code";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

/// Which feature attributes feed the `Name` and `Iata Code` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFields {
    pub name: String,
    pub code: String,
}

impl Default for ExportFields {
    fn default() -> Self {
        ExportFields {
            name: "name".to_string(),
            code: "iata_code".to_string(),
        }
    }
}

/// Write one `name, code, lat, lon` row per feature under [`ATTRIBUTE_HEADER`].
///
/// Ordinates always carry four decimals. Returns the number of data rows.
/// Every field after the first starts with a space, giving the `", "`
/// separator; a field that needs quoting is quoted with that space inside,
/// so a trimming CSV reader gets the original text back.
/// The file is flushed and closed on every path out of this function; a
/// failure part-way leaves a truncated file, never an open handle.
pub fn write_attribute_text(
    layer_name: &str,
    features: &[Feature],
    fields: &ExportFields,
    path: &Path,
) -> Result<usize> {
    let mut out = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| WorkflowError::csv(path, e))?;
    let csv_err = |e| WorkflowError::csv(path, e);

    out.write_record([NAME_COLUMN, CODE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN])
        .map_err(csv_err)?;

    for (index, feature) in features.iter().enumerate() {
        let point = feature.geometry.ok_or_else(|| WorkflowError::MissingGeometry {
            layer: layer_name.to_string(),
            index,
        })?;
        out.write_record([
            text_field(feature, &fields.name),
            format!(" {}", text_field(feature, &fields.code)),
            format!(" {:.4}", point.y),
            format!(" {:.4}", point.x),
        ])
        .map_err(csv_err)?;
    }

    out.flush().map_err(|e| WorkflowError::io(path, e))?;
    log::info!("wrote {} feature(s) to {}", features.len(), path.display());
    Ok(features.len())
}

fn text_field(feature: &Feature, field: &str) -> String {
    feature
        .attribute(field)
        .map(|v| v.as_text())
        .unwrap_or_default()
}

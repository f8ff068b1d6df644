use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::data::export::{ExportFields, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::data::filter::LatitudeBand;
use crate::data::model::Crs;
use crate::data::uri::delimiter_from_param;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Workflow configuration
// ---------------------------------------------------------------------------

/// Everything a workflow run needs. Every key is optional in the TOML file;
/// the defaults reproduce the airport workflow end to end.
///
/// ```toml
/// [source]
/// shapefile = "data/ne_10m_airports.shp"
///
/// [filter]
/// min = -23.44
/// max = 23.44
///
/// [style]
/// filtered_color = [0, 128, 0]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub filter: FilterConfig,
    pub layer: LayerConfig,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub shapefile: Option<PathBuf>,
    pub name_field: String,
    pub code_field: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let fields = ExportFields::default();
        SourceConfig {
            shapefile: None,
            name_field: fields.name,
            code_field: fields.code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Defaults to the shapefile's directory.
    pub directory: Option<PathBuf>,
    pub attribute_file: String,
    pub filtered_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: None,
            attribute_file: "240217_airportLatLong.txt".to_string(),
            filtered_file: "240217_lowLat.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            column: LATITUDE_COLUMN.to_string(),
            min: LatitudeBand::TROPICS.min,
            max: LatitudeBand::TROPICS.max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    pub name: String,
    pub encoding: String,
    pub delimiter: String,
    pub x_field: String,
    pub y_field: String,
    pub crs: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            name: "240217_lowLatLayer".to_string(),
            encoding: "UTF-8".to_string(),
            delimiter: ",".to_string(),
            x_field: LONGITUDE_COLUMN.to_string(),
            y_field: LATITUDE_COLUMN.to_string(),
            crs: "epsg:4326".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub source_color: Rgb,
    pub filtered_color: Rgb,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            source_color: color::CORAL,
            filtered_color: color::GREEN,
        }
    }
}

impl WorkflowConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
        let config: WorkflowConfig = toml::from_str(&text).map_err(|source| WorkflowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Check the values a run cannot do without.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(WorkflowError::Config(msg));

        if self.source.shapefile.is_none() {
            return invalid("no source shapefile given".to_string());
        }
        let FilterConfig { min, max, .. } = self.filter;
        if !min.is_finite() || !max.is_finite() {
            return invalid(format!("filter bounds must be finite, got [{min}, {max}]"));
        }
        if min > max {
            return invalid(format!("filter minimum {min} is above maximum {max}"));
        }
        if !self.delimiter().is_some_and(|c| c.is_ascii()) {
            return invalid(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.layer.delimiter
            ));
        }
        if self.output.attribute_file == self.output.filtered_file {
            return invalid("attribute and filtered files must differ".to_string());
        }
        if self.layer.name.is_empty() {
            return invalid("filtered layer name is empty".to_string());
        }
        self.crs()?;
        Ok(())
    }

    pub fn shapefile(&self) -> Result<&Path> {
        self.source
            .shapefile
            .as_deref()
            .ok_or_else(|| WorkflowError::Config("no source shapefile given".to_string()))
    }

    /// Where the text exports go.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output.directory {
            return dir.clone();
        }
        self.source
            .shapefile
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn attribute_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.attribute_file)
    }

    pub fn filtered_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.filtered_file)
    }

    pub fn band(&self) -> LatitudeBand {
        LatitudeBand::new(self.filter.min, self.filter.max)
    }

    pub fn export_fields(&self) -> ExportFields {
        ExportFields {
            name: self.source.name_field.clone(),
            code: self.source.code_field.clone(),
        }
    }

    pub fn delimiter(&self) -> Option<char> {
        delimiter_from_param(&self.layer.delimiter)
    }

    pub fn crs(&self) -> Result<Crs> {
        self.layer.crs.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_airport_workflow() {
        let c = WorkflowConfig::default();
        assert_eq!(c.band(), LatitudeBand::TROPICS);
        assert_eq!(c.layer.name, "240217_lowLatLayer");
        assert_eq!(c.layer.x_field, "Longitude");
        assert_eq!(c.layer.y_field, "Latitude");
        assert_eq!(c.style.source_color, color::CORAL);
        assert_eq!(c.style.filtered_color, color::GREEN);
        assert_eq!(c.crs().unwrap(), Crs::epsg(4326));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c: WorkflowConfig = toml::from_str(
            r#"
            [source]
            shapefile = "/data/ne_10m_airports.shp"

            [filter]
            min = -23.5
            max = 23.5

            [style]
            filtered_color = [1, 2, 3]
            "#,
        )
        .unwrap();
        assert_eq!(c.band(), LatitudeBand::new(-23.5, 23.5));
        assert_eq!(c.style.filtered_color, Rgb::from_rgb(1, 2, 3));
        assert_eq!(c.style.source_color, color::CORAL);
        assert_eq!(c.output_dir(), PathBuf::from("/data"));
        assert_eq!(c.attribute_path(), PathBuf::from("/data/240217_airportLatLong.txt"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<WorkflowConfig>("[filter]\nmid = 3.0\n").is_err());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut c = WorkflowConfig::default();
        assert!(c.validate().is_err());

        c.source.shapefile = Some("a.shp".into());
        assert!(c.validate().is_ok());
        assert_eq!(c.output_dir(), PathBuf::from(""));

        c.filter.min = 20.0;
        assert!(c.validate().is_err());
        c.filter.min = -10.0;

        c.layer.delimiter = ", ".into();
        assert!(c.validate().is_err());
        c.layer.delimiter = "§".into();
        assert!(c.validate().is_err());
        c.layer.delimiter = ",".into();

        c.layer.crs = "wgs84".into();
        assert!(c.validate().is_err());
    }
}

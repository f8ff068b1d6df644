use std::path::Path;

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::Writer;

use crate::error::{Result, WorkflowError};

/// WKT written next to generated shapefiles.
pub const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// One airport for a generated point shapefile.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleAirport {
    pub name: String,
    /// `None` writes a null `iata_code`.
    pub iata_code: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl SampleAirport {
    pub fn new(name: &str, iata_code: &str, lat: f64, lon: f64) -> Self {
        SampleAirport {
            name: name.to_string(),
            iata_code: Some(iata_code.to_string()),
            lat,
            lon,
        }
    }
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name)
        .map_err(|_| WorkflowError::Config(format!("'{name}' is not a valid dBase field name")))
}

/// Write `airports` as a point shapefile with `name` and `iata_code`
/// character fields, plus a WGS84 `.prj`.
pub fn write_point_shapefile(path: &Path, airports: &[SampleAirport]) -> Result<()> {
    let shp_err = |source| WorkflowError::Shapefile {
        path: path.to_path_buf(),
        source,
    };

    let table = TableWriterBuilder::new()
        .add_character_field(field_name("name")?, 80)
        .add_character_field(field_name("iata_code")?, 8);

    // The writer completes the file headers when dropped at the end of this scope.
    let mut writer = Writer::from_path(path, table).map_err(shp_err)?;
    for airport in airports {
        let mut record = Record::default();
        record.insert(
            "name".to_string(),
            FieldValue::Character(Some(airport.name.clone())),
        );
        record.insert(
            "iata_code".to_string(),
            FieldValue::Character(airport.iata_code.clone()),
        );
        let point = shapefile::Point::new(airport.lon, airport.lat);
        writer
            .write_shape_and_record(&point, &record)
            .map_err(shp_err)?;
    }
    drop(writer);

    let prj = path.with_extension("prj");
    std::fs::write(&prj, WGS84_PRJ).map_err(|e| WorkflowError::io(&prj, e))?;
    log::info!("wrote {} airport(s) to {}", airports.len(), path.display());
    Ok(())
}

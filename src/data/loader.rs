use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use shapefile::dbase::FieldValue;
use shapefile::Shape;

use super::model::{AttributeValue, Feature, Point};
use super::table::Table;
use super::uri::DelimitedTextUri;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Shapefile loader
// ---------------------------------------------------------------------------

/// Load every feature of a point shapefile (`.shp` plus its `.dbf`).
///
/// Point, PointM and PointZ shapes keep their X/Y. Null shapes become
/// features without geometry. Any other shape type is rejected, since the
/// layer is expected to be a point layer.
pub fn load_shapefile(path: &Path) -> Result<Vec<Feature>> {
    let shp_err = |source| WorkflowError::Shapefile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = shapefile::Reader::from_path(path).map_err(shp_err)?;
    let mut features = Vec::new();

    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.map_err(shp_err)?;

        let geometry = match shape {
            Shape::Point(p) => Some(Point::new(p.x, p.y)),
            Shape::PointM(p) => Some(Point::new(p.x, p.y)),
            Shape::PointZ(p) => Some(Point::new(p.x, p.y)),
            Shape::NullShape => None,
            other => {
                return Err(WorkflowError::UnsupportedGeometry {
                    path: path.to_path_buf(),
                    index,
                    kind: format!("{:?}", other.shapetype()),
                })
            }
        };

        let attributes: BTreeMap<String, AttributeValue> = HashMap::<String, FieldValue>::from(record)
            .into_iter()
            .map(|(name, value)| (name, field_to_attribute(value)))
            .collect();

        features.push(Feature {
            geometry,
            attributes,
        });
    }

    log::info!("loaded {} feature(s) from {}", features.len(), path.display());
    Ok(features)
}

fn field_to_attribute(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::String(s.trim_end().to_string()),
        FieldValue::Numeric(Some(v)) => AttributeValue::Float(v),
        FieldValue::Float(Some(v)) => AttributeValue::Float(v as f64),
        FieldValue::Double(v) => AttributeValue::Float(v),
        FieldValue::Currency(v) => AttributeValue::Float(v),
        FieldValue::Integer(i) => AttributeValue::Integer(i as i64),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
        FieldValue::Date(Some(d)) => {
            AttributeValue::Date(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }
        FieldValue::Memo(s) => AttributeValue::String(s),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None)
        | FieldValue::Date(None) => AttributeValue::Null,
        other => AttributeValue::String(format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// Delimited-text loader
// ---------------------------------------------------------------------------

/// Load the file a delimited-text URI points at.
///
/// Every column becomes an attribute with a guessed type; the X and Y fields
/// also build the point. Rows whose coordinates do not parse are kept as
/// features without geometry.
pub fn load_delimited_text(uri: &DelimitedTextUri) -> Result<Vec<Feature>> {
    let enc = uri.encoding.to_ascii_uppercase().replace('-', "");
    if enc != "UTF8" {
        return Err(WorkflowError::UnsupportedEncoding(uri.encoding.clone()));
    }
    if !uri.delimiter.is_ascii() {
        return Err(WorkflowError::InvalidUri {
            uri: uri.path.display().to_string(),
            reason: format!("delimiter '{}' is not ASCII", uri.delimiter),
        });
    }

    let table = Table::read_delimited(&uri.path, uri.delimiter as u8)?;
    let missing = |column: &str| WorkflowError::MissingColumn {
        path: uri.path.clone(),
        column: column.to_string(),
    };
    let x_idx = table.column_index(&uri.x_field).ok_or_else(|| missing(&uri.x_field))?;
    let y_idx = table.column_index(&uri.y_field).ok_or_else(|| missing(&uri.y_field))?;

    let mut skipped = 0usize;
    let features: Vec<Feature> = table
        .rows
        .iter()
        .map(|row| {
            let coord = |i: usize| row.get(i).and_then(|c| c.parse::<f64>().ok());
            let geometry = match (coord(x_idx), coord(y_idx)) {
                (Some(x), Some(y)) => Some(Point::new(x, y)),
                _ => {
                    skipped += 1;
                    None
                }
            };
            let attributes = table
                .headers
                .iter()
                .zip(row)
                .map(|(h, cell)| (h.clone(), AttributeValue::guess(cell)))
                .collect();
            Feature {
                geometry,
                attributes,
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!(
            "{}: {skipped} row(s) without usable coordinates",
            uri.path.display()
        );
    }
    log::info!("loaded {} feature(s) from {}", features.len(), uri.path.display());
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Crs;

    fn uri_for(path: &Path) -> DelimitedTextUri {
        DelimitedTextUri::new(path, "Longitude", "Latitude", Crs::epsg(4326))
    }

    #[test]
    fn delimited_rows_become_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("low.csv");
        std::fs::write(
            &path,
            "Name,Iata Code,Latitude,Longitude\nA,AAA,5.0000,10.0000\nB,BBB,oops,1.0\n",
        )
        .unwrap();

        let features = load_delimited_text(&uri_for(&path)).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].geometry, Some(Point::new(10.0, 5.0)));
        assert_eq!(
            features[0].attribute("Iata Code"),
            Some(&AttributeValue::String("AAA".into()))
        );
        assert_eq!(features[0].attribute("Latitude"), Some(&AttributeValue::Float(5.0)));
        assert_eq!(features[1].geometry, None);
    }

    #[test]
    fn missing_coordinate_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("low.csv");
        std::fs::write(&path, "Name,Lat,Lon\nA,1,2\n").unwrap();
        let err = load_delimited_text(&uri_for(&path)).unwrap_err();
        assert!(matches!(err, WorkflowError::MissingColumn { .. }));
    }

    #[test]
    fn non_utf8_encoding_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("low.csv");
        std::fs::write(&path, "Latitude,Longitude\n1,2\n").unwrap();
        let mut uri = uri_for(&path);
        uri.encoding = "latin1".into();
        assert!(matches!(
            load_delimited_text(&uri),
            Err(WorkflowError::UnsupportedEncoding(_))
        ));
        uri.encoding = "utf8".into();
        assert_eq!(load_delimited_text(&uri).unwrap().len(), 1);
    }

    #[test]
    fn missing_shapefile_is_a_shapefile_error() {
        let err = load_shapefile(Path::new("/no/such/airports.shp")).unwrap_err();
        assert!(matches!(err, WorkflowError::Shapefile { .. }));
    }

    #[test]
    fn dbase_values_map_to_attributes() {
        assert_eq!(
            field_to_attribute(FieldValue::Character(Some("LHR  ".into()))),
            AttributeValue::String("LHR".into())
        );
        assert_eq!(field_to_attribute(FieldValue::Character(None)), AttributeValue::Null);
        assert_eq!(field_to_attribute(FieldValue::Numeric(Some(2.5))), AttributeValue::Float(2.5));
        assert_eq!(field_to_attribute(FieldValue::Integer(3)), AttributeValue::Integer(3));
    }
}

use std::path::PathBuf;

use url::Url;

use super::model::Crs;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Delimited-text layer source
// ---------------------------------------------------------------------------

/// Everything a delimited-text layer needs to georeference a plain CSV file.
///
/// Round-trips through a locator string of the form
/// `file:///data/low.csv?encoding=UTF-8&delimiter=%2C&xField=Longitude&yField=Latitude&crs=epsg%3A4326`.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedTextUri {
    pub path: PathBuf,
    pub encoding: String,
    pub delimiter: char,
    pub x_field: String,
    pub y_field: String,
    pub crs: Crs,
}

impl DelimitedTextUri {
    pub fn new(path: impl Into<PathBuf>, x_field: &str, y_field: &str, crs: Crs) -> Self {
        DelimitedTextUri {
            path: path.into(),
            encoding: "UTF-8".to_string(),
            delimiter: ',',
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            crs,
        }
    }

    /// Build the locator string. Relative paths are resolved against the
    /// current directory, since a file URL is always absolute.
    pub fn to_uri_string(&self) -> Result<String> {
        let abs = std::path::absolute(&self.path).map_err(|e| WorkflowError::io(&self.path, e))?;
        let mut url = Url::from_file_path(&abs).map_err(|_| WorkflowError::InvalidUri {
            uri: abs.display().to_string(),
            reason: "path cannot be expressed as a file URL".to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("encoding", &self.encoding)
            .append_pair("delimiter", &delimiter_to_param(self.delimiter))
            .append_pair("xField", &self.x_field)
            .append_pair("yField", &self.y_field)
            .append_pair("crs", &self.crs.to_string().to_ascii_lowercase());

        Ok(url.to_string())
    }

    /// Parse a locator string. Unknown query keys are ignored.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| WorkflowError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "file" {
            return Err(invalid("scheme must be file"));
        }
        let path = url
            .to_file_path()
            .map_err(|_| invalid("not a local file path"))?;

        let mut encoding = None;
        let mut delimiter = None;
        let mut x_field = None;
        let mut y_field = None;
        let mut crs = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "encoding" => encoding = Some(value.into_owned()),
                "delimiter" => {
                    delimiter = Some(
                        delimiter_from_param(&value)
                            .ok_or_else(|| invalid("delimiter must be a single character"))?,
                    )
                }
                "xField" => x_field = Some(value.into_owned()),
                "yField" => y_field = Some(value.into_owned()),
                "crs" => crs = Some(value.parse::<Crs>()?),
                other => log::debug!("ignoring unknown URI parameter '{other}'"),
            }
        }

        Ok(DelimitedTextUri {
            path,
            encoding: encoding.unwrap_or_else(|| "UTF-8".to_string()),
            delimiter: delimiter.unwrap_or(','),
            x_field: x_field.ok_or_else(|| invalid("missing xField"))?,
            y_field: y_field.ok_or_else(|| invalid("missing yField"))?,
            crs: crs.ok_or_else(|| invalid("missing crs"))?,
        })
    }
}

fn delimiter_to_param(c: char) -> String {
    match c {
        '\t' => "\\t".to_string(),
        other => other.to_string(),
    }
}

/// Parse a delimiter parameter; `\t` and `tab` mean TAB.
pub fn delimiter_from_param(s: &str) -> Option<char> {
    if s == "\\t" || s.eq_ignore_ascii_case("tab") {
        return Some('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

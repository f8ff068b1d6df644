use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

// ---------------------------------------------------------------------------
// AttributeValue – a single cell of a feature's attribute record
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value, covering what dBase tables and
/// delimited text files can hold.
/// Used as a `BTreeMap` value and sorted in the attribute table, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// `YYYY-MM-DD`, kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so attribute values can be sorted --

impl Eq for AttributeValue {}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use AttributeValue::*;
        fn discriminant(v: &AttributeValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for AttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            AttributeValue::String(s) | AttributeValue::Date(s) => s.hash(state),
            AttributeValue::Integer(i) => i.hash(state),
            AttributeValue::Float(f) => f.to_bits().hash(state),
            AttributeValue::Bool(b) => b.hash(state),
            AttributeValue::Null => {}
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Date(d) => write!(f, "{d}"),
            AttributeValue::Null => write!(f, "NULL"),
        }
    }
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text to write into a delimited file; `Null` is the empty field.
    pub fn as_text(&self) -> String {
        match self {
            AttributeValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Infer a type for a cell read from delimited text.
    pub fn guess(s: &str) -> AttributeValue {
        if s.is_empty() {
            return AttributeValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return AttributeValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return AttributeValue::Float(f);
        }
        if s == "true" || s == "false" {
            return AttributeValue::Bool(s == "true");
        }
        AttributeValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in layer coordinates. For geographic CRSs `x` is longitude and
/// `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

// ---------------------------------------------------------------------------
// Feature – one georeferenced record of a layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// `None` for null shapes and rows whose coordinates did not parse.
    pub geometry: Option<Point>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(geometry: Option<Point>) -> Self {
        Feature {
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

// ---------------------------------------------------------------------------
// Coordinate reference system
// ---------------------------------------------------------------------------

/// An authority-qualified CRS identifier such as `EPSG:4326`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    pub authority: String,
    pub code: u32,
}

impl Crs {
    pub const WGS84: u32 = 4326;

    pub fn epsg(code: u32) -> Self {
        Crs {
            authority: "EPSG".to_string(),
            code,
        }
    }
}

impl FromStr for Crs {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkflowError::InvalidCrs(s.to_string());
        let (authority, code) = s.trim().split_once(':').ok_or_else(invalid)?;
        if authority.is_empty() || !authority.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        let code = code.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Crs {
            authority: authority.to_ascii_uppercase(),
            code,
        })
    }
}

impl TryFrom<String> for Crs {
    type Error = WorkflowError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

//! Data layer: feature model, file loaders, the table used for filtering,
//! and the text exports.
//!
//! Architecture:
//! ```text
//!   airports.shp ──► loader ──► Vec<Feature> ──► export ──► airportLatLong.txt
//!                                                              │
//!                                                              ▼
//!                                                      ┌──────────────┐
//!                                                      │ table+filter │  Latitude in [-10, 10]
//!                                                      └──────────────┘
//!                                                              │
//!                                                              ▼
//!   Vec<Feature> ◄── loader ◄── uri (xField/yField/crs) ◄── lowLat.csv
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod table;
pub mod uri;

//! Airport layer wrangling.
//!
//! Loads a point shapefile into a [`session::Project`], exports selected
//! attributes to text, keeps the rows inside a latitude band, and reloads
//! that subset as a delimited-text layer. [`workflow::run`] ties it together.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod state;
pub mod ui;
pub mod workflow;

pub use error::{Result, WorkflowError};

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::data::loader::{load_delimited_text, load_shapefile};
use crate::data::model::{Crs, Feature};
use crate::data::uri::DelimitedTextUri;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// Which loader reads a layer's `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Shapefile on disk; `source` is its path.
    Ogr,
    /// Delimited text; `source` is a [`DelimitedTextUri`] string.
    #[serde(rename = "delimitedtext")]
    DelimitedText,
}

/// The single-symbol renderer of a point layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub color: Rgb,
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol { color: color::GRAY }
    }
}

/// A named collection of point features plus its style.
///
/// Only the definition (name, provider, source, CRS, symbol) is persisted;
/// features and validity are recomputed from the source on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayer {
    pub name: String,
    pub provider: Provider,
    pub source: String,
    pub crs: Option<Crs>,
    #[serde(default)]
    pub symbol: Symbol,
    #[serde(skip)]
    valid: bool,
    #[serde(skip)]
    error: Option<String>,
    #[serde(skip)]
    features: Vec<Feature>,
}

impl MapLayer {
    /// Load a shapefile layer. Load failures are returned, not recorded.
    pub fn from_shapefile(path: &Path, name: &str) -> Result<Self> {
        let features = load_shapefile(path)?;
        Ok(MapLayer {
            name: name.to_string(),
            provider: Provider::Ogr,
            source: path.display().to_string(),
            crs: prj_crs(path),
            symbol: Symbol::default(),
            valid: true,
            error: None,
            features,
        })
    }

    /// Build a delimited-text layer. This never fails: a layer whose source
    /// cannot be read is returned with `is_valid() == false`.
    pub fn from_delimited_text(uri: &DelimitedTextUri, name: &str) -> Self {
        // A source that cannot be written as a locator would not reload either.
        let (source, loaded) = match uri.to_uri_string() {
            Ok(source) => (source, load_delimited_text(uri)),
            Err(e) => (uri.path.display().to_string(), Err(e)),
        };
        let mut layer = MapLayer {
            name: name.to_string(),
            provider: Provider::DelimitedText,
            source,
            crs: Some(uri.crs.clone()),
            symbol: Symbol::default(),
            valid: false,
            error: None,
            features: Vec::new(),
        };
        layer.apply_load(loaded);
        layer
    }

    /// Re-read features from `source`. Failure marks the layer invalid.
    pub fn reload(&mut self) {
        let loaded = match self.provider {
            Provider::Ogr => load_shapefile(Path::new(&self.source)),
            Provider::DelimitedText => {
                DelimitedTextUri::parse(&self.source).and_then(|uri| load_delimited_text(&uri))
            }
        };
        self.apply_load(loaded);
    }

    fn apply_load(&mut self, loaded: Result<Vec<Feature>>) {
        match loaded {
            Ok(features) => {
                self.features = features;
                self.valid = true;
                self.error = None;
            }
            Err(e) => {
                log::warn!("layer '{}' is invalid: {e}", self.name);
                self.features.clear();
                self.valid = false;
                self.error = Some(error_chain(&e));
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Why the last load failed, if it did.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn set_color(&mut self, color: Rgb) {
        log::debug!("layer '{}': symbol colour {} -> {color}", self.name, self.symbol.color);
        self.symbol.color = color;
    }

    pub fn color(&self) -> Rgb {
        self.symbol.color
    }

    /// Layer built directly from features, for callers that already hold them.
    pub fn in_memory(name: &str, features: Vec<Feature>) -> Self {
        MapLayer {
            name: name.to_string(),
            provider: Provider::Ogr,
            source: String::new(),
            crs: Some(Crs::epsg(Crs::WGS84)),
            symbol: Symbol::default(),
            valid: true,
            error: None,
            features,
        }
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

/// Recognise the WGS84 geographic `.prj` that ships next to most
/// lon/lat shapefiles. Anything else is left unknown.
fn prj_crs(shp: &Path) -> Option<Crs> {
    let wkt = std::fs::read_to_string(shp.with_extension("prj")).ok()?;
    let geographic = wkt.starts_with("GEOGCS") && !wkt.contains("PROJCS");
    (geographic && wkt.contains("WGS_1984")).then(|| Crs::epsg(Crs::WGS84))
}

// ---------------------------------------------------------------------------
// Project – the session's layer registry
// ---------------------------------------------------------------------------

/// An ordered registry of map layers.
///
/// Names are not unique at this level; callers that want a single layer per
/// name check [`Project::has_layer`] first.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Project {
    layers: Vec<MapLayer>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Project {
    pub fn new() -> Self {
        Project::default()
    }

    /// Open a project file. A missing file gives an empty project bound to
    /// `path`; every stored layer is reloaded from its source.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("project {} does not exist yet, starting empty", path.display());
            return Ok(Project {
                layers: Vec::new(),
                path: Some(path.to_path_buf()),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
        let mut project: Project = serde_json::from_str(&text).map_err(|source| WorkflowError::Project {
            path: path.to_path_buf(),
            source,
        })?;
        for layer in &mut project.layers {
            layer.reload();
        }
        project.path = Some(path.to_path_buf());

        log::info!("opened project {} with {} layer(s)", path.display(), project.layers.len());
        Ok(project)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| WorkflowError::Config("project has no file to save to".to_string()))?;
        self.write_to(&path)
    }

    /// Save to `path` and keep saving there afterwards.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write through a temporary file in the same directory, then rename.
    fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| WorkflowError::Project {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| WorkflowError::io(dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| WorkflowError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| WorkflowError::io(path, e.error))?;

        log::info!("saved project {} ({} layer(s))", path.display(), self.layers.len());
        Ok(())
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers called `name`, in insertion order.
    pub fn map_layers_by_name(&self, name: &str) -> Vec<&MapLayer> {
        self.layers.iter().filter(|l| l.name == name).collect()
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    /// First layer called `name`.
    pub fn layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut MapLayer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    /// Add a layer and give it the next automatic colour.
    pub fn add_map_layer(&mut self, mut layer: MapLayer) -> &MapLayer {
        layer.symbol.color = color::auto_color(self.layers.len());
        log::info!(
            "added layer '{}' ({} feature(s), valid: {})",
            layer.name,
            layer.feature_count(),
            layer.valid
        );
        self.layers.push(layer);
        &self.layers[self.layers.len() - 1]
    }

    /// Load a shapefile and add it. An empty `base_name` names the layer
    /// after the file stem.
    pub fn add_vector_layer(&mut self, path: &Path, base_name: &str) -> Result<&MapLayer> {
        let name = if base_name.is_empty() {
            layer_name_for(path)
        } else {
            base_name.to_string()
        };
        let layer = MapLayer::from_shapefile(path, &name)?;
        Ok(self.add_map_layer(layer))
    }

    /// Remove every layer called `name`; returns how many went.
    pub fn remove_layers(&mut self, name: &str) -> usize {
        let before = self.layers.len();
        self.layers.retain(|l| l.name != name);
        before - self.layers.len()
    }
}

/// Layer name a shapefile gets when added without an explicit name.
pub fn layer_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

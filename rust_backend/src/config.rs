//! Viewer configuration file support.
//!
//! This module reads dataset settings (class scheme, index list, column names,
//! raw-value break points) from a TOML file. Every section has defaults that
//! match the column names of the orchard datasets, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classification::{BreakpointError, Breakpoints, Classifier};
use crate::core::classes::ClassScheme;
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub columns: PointColumns,
    #[serde(default)]
    pub polygons: PolygonColumns,
    #[serde(default)]
    pub zones: ZoneColumns,
    /// Raw-value thresholds per index, used when no class column exists.
    #[serde(default)]
    pub breaks: BTreeMap<String, Breakpoints>,
}

/// Dataset-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSettings {
    #[serde(default)]
    pub scheme: ClassScheme,
    /// Index columns to look for, in display order.
    #[serde(default = "default_indices")]
    pub indices: Vec<String>,
    /// Suffixes tried, in order, to find the class column of an index.
    #[serde(default = "default_class_suffixes")]
    pub class_suffixes: Vec<String>,
}

/// Column names of the point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointColumns {
    pub id: String,
    pub block: String,
    pub species: String,
    pub variety: String,
    pub crop: String,
    pub flight_date: String,
    pub lat: String,
    pub lon: String,
    pub height: String,
}

/// Column names of the block polygon attribute table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonColumns {
    pub name: String,
    pub area: String,
    pub species: String,
    pub variety: String,
    pub year: String,
}

/// Column names of the management zone attribute table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneColumns {
    pub index: String,
    pub level: String,
    pub area: String,
    pub trees: String,
    pub flight_date: String,
    pub block: String,
}

fn default_indices() -> Vec<String> {
    ["ndvi", "osavi", "ndre", "lci"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_class_suffixes() -> Vec<String> {
    ["_clase", "_class", "_Class", "_code"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            scheme: ClassScheme::default(),
            indices: default_indices(),
            class_suffixes: default_class_suffixes(),
        }
    }
}

impl Default for PointColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            block: "Cuartel".to_string(),
            species: "Especie".to_string(),
            variety: "Variedad".to_string(),
            crop: "Cultivo".to_string(),
            flight_date: "fecha_vuelo".to_string(),
            lat: "lat".to_string(),
            lon: "lon".to_string(),
            height: "altura_m".to_string(),
        }
    }
}

impl Default for PolygonColumns {
    fn default() -> Self {
        Self {
            name: "Cuartel".to_string(),
            area: "Superficie_ha".to_string(),
            species: "Especie".to_string(),
            variety: "Variedad".to_string(),
            year: "Apla".to_string(),
        }
    }
}

impl Default for ZoneColumns {
    fn default() -> Self {
        Self {
            index: "indice".to_string(),
            level: "clase".to_string(),
            area: "area_ha".to_string(),
            trees: "n_arboles".to_string(),
            flight_date: "fecha_vuelo".to_string(),
            block: "Cuartel".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ViewerConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded viewer configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let deserializer = toml::Deserializer::new(content);
        let config: ViewerConfig = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| ConfigError::Parse(e.path().to_string(), e.inner().to_string()))?;
        config.classifier()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `orchard.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("orchard.toml"),
            PathBuf::from("rust_backend/orchard.toml"),
            PathBuf::from("../orchard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        log::debug!("No orchard.toml found, using default configuration");
        Ok(Self::default())
    }

    /// Classifier for this dataset's scheme and break points.
    pub fn classifier(&self) -> Result<Classifier, BreakpointError> {
        self.breaks
            .iter()
            .try_fold(Classifier::new(self.dataset.scheme), |classifier, (index, breaks)| {
                classifier.with_breakpoints(index, breaks.clone())
            })
    }
}

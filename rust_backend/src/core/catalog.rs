//! Catalog of the spectral indices the dashboards know how to describe.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// What an index is mostly used to judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexCategory {
    Vigor,
    Chlorophyll,
    CanopyStructure,
}

impl IndexCategory {
    pub fn label(&self) -> &'static str {
        match self {
            IndexCategory::Vigor => "Vegetative vigor",
            IndexCategory::Chlorophyll => "Chlorophyll content",
            IndexCategory::CanopyStructure => "Canopy structure",
        }
    }
}

/// Descriptive metadata of one index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub full_name: &'static str,
    pub category: IndexCategory,
    /// Nominal (min, max) range of valid values.
    pub range: (f64, f64),
}

const ENTRIES: &[IndexInfo] = &[
    IndexInfo {
        key: "ndvi",
        name: "NDVI",
        full_name: "Normalized Difference Vegetation Index",
        category: IndexCategory::Vigor,
        range: (0.0, 1.0),
    },
    IndexInfo {
        key: "osavi",
        name: "OSAVI",
        full_name: "Optimized Soil Adjusted Vegetation Index",
        category: IndexCategory::Vigor,
        range: (0.0, 0.6),
    },
    IndexInfo {
        key: "gndvi",
        name: "GNDVI",
        full_name: "Green Normalized Difference Vegetation Index",
        category: IndexCategory::Vigor,
        range: (0.0, 1.0),
    },
    IndexInfo {
        key: "savi",
        name: "SAVI",
        full_name: "Soil Adjusted Vegetation Index",
        category: IndexCategory::Vigor,
        range: (0.0, 0.5),
    },
    IndexInfo {
        key: "msavi2",
        name: "MSAVI2",
        full_name: "Modified Soil Adjusted Vegetation Index",
        category: IndexCategory::Vigor,
        range: (0.0, 0.5),
    },
    IndexInfo {
        key: "evi2",
        name: "EVI2",
        full_name: "Enhanced Vegetation Index (2 bands)",
        category: IndexCategory::Vigor,
        range: (0.0, 0.5),
    },
    IndexInfo {
        key: "lci",
        name: "LCI",
        full_name: "Leaf Chlorophyll Index",
        category: IndexCategory::Chlorophyll,
        range: (0.1, 0.85),
    },
    IndexInfo {
        key: "ndre",
        name: "NDRE",
        full_name: "Normalized Difference Red Edge",
        category: IndexCategory::Chlorophyll,
        range: (0.15, 0.5),
    },
    IndexInfo {
        key: "cirededge",
        name: "CIRedEdge",
        full_name: "Chlorophyll Index Red Edge",
        category: IndexCategory::Chlorophyll,
        range: (0.0, 1.0),
    },
    IndexInfo {
        key: "mcari",
        name: "MCARI",
        full_name: "Modified Chlorophyll Absorption Ratio Index",
        category: IndexCategory::CanopyStructure,
        range: (0.0, 1.0),
    },
];

static CATALOG: Lazy<HashMap<&'static str, &'static IndexInfo>> =
    Lazy::new(|| ENTRIES.iter().map(|info| (info.key, info)).collect());

/// Look up an index by key, case-insensitively.
pub fn index_info(key: &str) -> Option<&'static IndexInfo> {
    CATALOG.get(key.to_lowercase().as_str()).copied()
}

/// Display name, falling back to the upper-cased key for unknown indices.
pub fn display_name(key: &str) -> String {
    index_info(key)
        .map(|info| info.name.to_string())
        .unwrap_or_else(|| key.to_uppercase())
}

/// All catalogued index keys, in catalog order.
pub fn known_indices() -> Vec<&'static str> {
    ENTRIES.iter().map(|info| info.key).collect()
}

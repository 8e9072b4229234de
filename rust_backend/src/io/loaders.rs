use anyhow::{Context, Result};
use std::path::Path;

use crate::classification::Classifier;
use crate::config::ViewerConfig;
use crate::core::domain::{BlockPolygon, PointTable, ZoneRecord};
use crate::parsing::{csv_parser, polygon_parser};

/// Delimited-text extensions accepted for every table.
const TABLE_EXTENSIONS: [&str; 2] = ["csv", "txt"];

fn check_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .context("File has no extension")?;

    if !TABLE_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        anyhow::bail!("Unsupported file format: {}", extension);
    }
    Ok(())
}

/// Result of loading a point table
#[derive(Debug)]
pub struct PointLoadResult {
    pub table: PointTable,
    pub num_points: usize,
    pub indices: Vec<String>,
}

impl PointLoadResult {
    pub fn new(table: PointTable) -> Self {
        let num_points = table.len();
        let indices = table.schema.index_names();
        Self {
            table,
            num_points,
            indices,
        }
    }
}

/// Loads and classifies point tables
pub struct PointLoader;

impl PointLoader {
    /// Load a point table from a delimited file
    pub fn load_from_file(
        path: &Path,
        config: &ViewerConfig,
        classifier: &Classifier,
    ) -> Result<PointLoadResult> {
        check_extension(path)?;
        let table = csv_parser::parse_points_csv(path, config, classifier)
            .context("Failed to parse point table")?;

        if table.schema.indices.is_empty() {
            log::warn!(
                "No configured index columns found in {}",
                path.display()
            );
        }
        log::info!(
            "Loaded {} points with indices {:?} from {}",
            table.len(),
            table.schema.index_names(),
            path.display()
        );

        Ok(PointLoadResult::new(table))
    }

    /// Load a point table from CSV text
    pub fn load_from_str(
        csv: &str,
        config: &ViewerConfig,
        classifier: &Classifier,
    ) -> Result<PointLoadResult> {
        let table = csv_parser::parse_points_csv_str(csv, config, classifier)
            .context("Failed to parse point table text")?;
        Ok(PointLoadResult::new(table))
    }
}

/// Loads block and zone attribute tables
pub struct PolygonLoader;

impl PolygonLoader {
    /// Load block polygon attributes from a delimited file
    pub fn load_blocks(path: &Path, config: &ViewerConfig) -> Result<Vec<BlockPolygon>> {
        check_extension(path)?;
        let blocks = polygon_parser::parse_blocks_csv(path, &config.polygons)
            .with_context(|| format!("Failed to parse block table {}", path.display()))?;
        log::info!("Loaded {} block polygons from {}", blocks.len(), path.display());
        Ok(blocks)
    }

    /// Load management zone attributes from a delimited file
    pub fn load_zones(path: &Path, config: &ViewerConfig) -> Result<Vec<ZoneRecord>> {
        check_extension(path)?;
        let zones = polygon_parser::parse_zones_csv(path, &config.zones)
            .with_context(|| format!("Failed to parse zone table {}", path.display()))?;
        log::info!("Loaded {} management zones from {}", zones.len(), path.display());
        Ok(zones)
    }
}

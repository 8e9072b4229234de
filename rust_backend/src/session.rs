//! Per-process analysis session.
//!
//! A [`SessionContext`] owns the configuration, the tables loaded so far
//! (cached by path, loaded at most once) and the active filter selection.
//! Every query re-filters the cached base table into a fresh copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classification::Classifier;
use crate::config::ViewerConfig;
use crate::core::classes::ClassScheme;
use crate::core::domain::{BlockPolygon, PointTable, ZoneRecord};
use crate::error::{ConfigError, ViewerError, ViewerResult};
use crate::io::export;
use crate::io::loaders::{PointLoader, PolygonLoader};
use crate::services::{
    block_table, breakdown, build_insights, compare_first_flights, compare_flights, summarize,
    summarize_zones, surface_info, BlockRow, Breakdown, FlightComparison, GroupKey, IndexSummary,
    Insights, SurfaceInfo, ZoneSummary,
};
use crate::transformations::filtering::{apply_cascade, Choice, FilterOutcome, FilterSelection};

pub struct SessionContext {
    config: ViewerConfig,
    classifier: Classifier,
    points: HashMap<PathBuf, Arc<PointTable>>,
    blocks: HashMap<PathBuf, Arc<Vec<BlockPolygon>>>,
    zones: HashMap<PathBuf, Arc<Vec<ZoneRecord>>>,
    active_points: Option<PathBuf>,
    active_blocks: Option<PathBuf>,
    active_zones: Option<PathBuf>,
    selection: FilterSelection,
}

impl SessionContext {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        let classifier = config.classifier()?;
        Ok(Self {
            config,
            classifier,
            points: HashMap::new(),
            blocks: HashMap::new(),
            zones: HashMap::new(),
            active_points: None,
            active_blocks: None,
            active_zones: None,
            selection: FilterSelection::default(),
        })
    }

    /// Session configured from `orchard.toml` in the default locations.
    pub fn from_default_config() -> Result<Self, ConfigError> {
        Self::new(ViewerConfig::from_default_location()?)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scheme(&self) -> ClassScheme {
        self.classifier.scheme()
    }

    /// Load (or reuse) a point table and make it the active one.
    pub fn load_points(&mut self, path: &Path) -> ViewerResult<Arc<PointTable>> {
        let key = path.to_path_buf();
        let table = match self.points.get(&key) {
            Some(table) => {
                log::debug!("Reusing cached point table {}", path.display());
                Arc::clone(table)
            }
            None => {
                let loaded = PointLoader::load_from_file(path, &self.config, &self.classifier)?;
                let table = Arc::new(loaded.table);
                self.points.insert(key.clone(), Arc::clone(&table));
                table
            }
        };
        self.active_points = Some(key);
        Ok(table)
    }

    /// Load (or reuse) block polygons. An unreadable file is reported as
    /// absent; the point table does not depend on it.
    pub fn load_blocks(&mut self, path: &Path) -> Option<Arc<Vec<BlockPolygon>>> {
        let key = path.to_path_buf();
        if !self.blocks.contains_key(&key) {
            match PolygonLoader::load_blocks(path, &self.config) {
                Ok(blocks) => {
                    self.blocks.insert(key.clone(), Arc::new(blocks));
                }
                Err(e) => {
                    log::warn!("Block polygons unavailable: {:#}", e);
                    return None;
                }
            }
        }
        self.active_blocks = Some(key.clone());
        self.blocks.get(&key).cloned()
    }

    /// Load (or reuse) management zones; unreadable files are reported as absent.
    pub fn load_zones(&mut self, path: &Path) -> Option<Arc<Vec<ZoneRecord>>> {
        let key = path.to_path_buf();
        if !self.zones.contains_key(&key) {
            match PolygonLoader::load_zones(path, &self.config) {
                Ok(zones) => {
                    self.zones.insert(key.clone(), Arc::new(zones));
                }
                Err(e) => {
                    log::warn!("Management zones unavailable: {:#}", e);
                    return None;
                }
            }
        }
        self.active_zones = Some(key.clone());
        self.zones.get(&key).cloned()
    }

    /// The active point table.
    pub fn points(&self) -> ViewerResult<Arc<PointTable>> {
        self.active_points
            .as_ref()
            .and_then(|key| self.points.get(key))
            .cloned()
            .ok_or(ViewerError::NotLoaded)
    }

    pub fn blocks(&self) -> Option<Arc<Vec<BlockPolygon>>> {
        self.active_blocks
            .as_ref()
            .and_then(|key| self.blocks.get(key))
            .cloned()
    }

    pub fn zones(&self) -> Option<Arc<Vec<ZoneRecord>>> {
        self.active_zones
            .as_ref()
            .and_then(|key| self.zones.get(key))
            .cloned()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    /// Apply the active selection to the active table.
    pub fn filter(&self) -> ViewerResult<FilterOutcome> {
        let table = self.points()?;
        Ok(apply_cascade(&table, &self.selection))
    }

    /// The active selection without its flight constraint, for comparisons.
    fn filter_all_flights(&self) -> ViewerResult<PointTable> {
        let selection = FilterSelection {
            flight_date: Choice::All,
            ..self.selection.clone()
        };
        let table = self.points()?;
        Ok(apply_cascade(&table, &selection).table)
    }

    fn check_index(&self, table: &PointTable, index: &str) -> ViewerResult<String> {
        let index = index.to_lowercase();
        if table.schema.index(&index).is_none() {
            return Err(ViewerError::UnknownIndex(index));
        }
        Ok(index)
    }

    pub fn summary(&self, index: &str) -> ViewerResult<IndexSummary> {
        let table = self.filter()?.table;
        let index = self.check_index(&table, index)?;
        Ok(summarize(&table, &index, self.scheme()))
    }

    pub fn breakdown(&self, index: &str, key: GroupKey) -> ViewerResult<Breakdown> {
        let table = self.filter()?.table;
        let index = self.check_index(&table, index)?;
        Ok(breakdown(&table, &index, key, self.scheme()))
    }

    pub fn compare(&self, index: &str, date_before: &str, date_after: &str) -> ViewerResult<FlightComparison> {
        let table = self.filter_all_flights()?;
        let index = self.check_index(&table, index)?;
        Ok(compare_flights(&table, &index, date_before, date_after, self.scheme()))
    }

    /// Compare the first two flights left by the selection, if any.
    pub fn compare_first(&self, index: &str) -> ViewerResult<Option<FlightComparison>> {
        let table = self.filter_all_flights()?;
        let index = self.check_index(&table, index)?;
        Ok(compare_first_flights(&table, &index, self.scheme()))
    }

    pub fn insights(&self, index: &str) -> ViewerResult<Insights> {
        let table = self.filter()?.table;
        let index = self.check_index(&table, index)?;
        Ok(build_insights(&table, &index, self.scheme()))
    }

    /// Surface of the selected blocks; `None` without polygons or matches.
    pub fn surface(&self) -> ViewerResult<Option<SurfaceInfo>> {
        let table = self.filter()?.table;
        Ok(self
            .blocks()
            .and_then(|blocks| surface_info(&table, &blocks, &self.selection.blocks)))
    }

    pub fn block_table(&self, index: &str) -> ViewerResult<Vec<BlockRow>> {
        let table = self.filter()?.table;
        let index = self.check_index(&table, index)?;
        let polygons = self.blocks().map(|b| b.as_ref().clone()).unwrap_or_default();
        Ok(block_table(&table, &polygons, &index, self.scheme()))
    }

    /// Zone summary for the selected flight and blocks; `None` without zones.
    pub fn zone_summary(&self, index: &str) -> Option<ZoneSummary> {
        let zones = self.zones()?;
        Some(summarize_zones(
            &zones,
            index,
            self.selection.flight_date.value(),
            &self.selection.blocks,
        ))
    }

    pub fn export_points(&self, path: &Path) -> ViewerResult<()> {
        let table = self.filter()?.table;
        let mut df = export::points_frame(&table).map_err(export_error)?;
        export::write_csv(&mut df, path).map_err(export_error)
    }

    pub fn export_block_table(&self, index: &str, path: &Path) -> ViewerResult<()> {
        let rows = self.block_table(index)?;
        let mut df = export::block_table_frame(&rows, index).map_err(export_error)?;
        export::write_csv(&mut df, path).map_err(export_error)
    }

    pub fn export_breakdown(&self, index: &str, key: GroupKey, path: &Path) -> ViewerResult<()> {
        let result = self.breakdown(index, key)?;
        let mut df = export::breakdown_frame(&result).map_err(export_error)?;
        export::write_csv(&mut df, path).map_err(export_error)
    }

    pub fn export_zone_summary(&self, index: &str, path: &Path) -> ViewerResult<()> {
        let summary = self
            .zone_summary(index)
            .ok_or_else(|| ViewerError::ExportError("no management zones loaded".to_string()))?;
        let mut df = export::zone_summary_frame(&summary).map_err(export_error)?;
        export::write_csv(&mut df, path).map_err(export_error)
    }
}

fn export_error(e: anyhow::Error) -> ViewerError {
    ViewerError::ExportError(format!("{:#}", e))
}

use pyo3::prelude::*;
use std::path::PathBuf;

use crate::config::ViewerConfig;
use crate::services::GroupKey;
use crate::session::SessionContext;
use crate::transformations::FilterSelection;

use super::{to_json, to_py_err};

/// Analysis session exposed to Python
#[pyclass(name = "Session")]
pub struct PySession {
    inner: SessionContext,
}

fn config_err(e: crate::error::ConfigError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

#[pymethods]
impl PySession {
    /// Create a session from a TOML file, or from the default location
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => ViewerConfig::from_file(path),
            None => ViewerConfig::from_default_location(),
        }
        .map_err(config_err)?;
        let inner = SessionContext::new(config).map_err(config_err)?;
        Ok(Self { inner })
    }

    /// Load the point table; returns the number of points
    fn load_points(&mut self, path: PathBuf) -> PyResult<usize> {
        self.inner
            .load_points(&path)
            .map(|table| table.len())
            .map_err(to_py_err)
    }

    /// Load block polygon attributes; returns False when unavailable
    fn load_blocks(&mut self, path: PathBuf) -> bool {
        self.inner.load_blocks(&path).is_some()
    }

    /// Load management zone attributes; returns False when unavailable
    fn load_zones(&mut self, path: PathBuf) -> bool {
        self.inner.load_zones(&path).is_some()
    }

    /// Replace the filter selection (JSON object with crop, flight_date,
    /// species, variety and blocks)
    fn set_selection(&mut self, selection_json: String) -> PyResult<()> {
        let selection: FilterSelection = serde_json::from_str(&selection_json).map_err(|e| {
            pyo3::exceptions::PyValueError::new_err(format!("Failed to parse JSON: {}", e))
        })?;
        self.inner.set_selection(selection);
        Ok(())
    }

    /// Options offered by every filter stage for the current selection
    fn filter_options(&self) -> PyResult<String> {
        let outcome = self.inner.filter().map_err(to_py_err)?;
        to_json(&outcome.stages)
    }

    /// Filtered points as JSON records
    fn points(&self) -> PyResult<String> {
        let outcome = self.inner.filter().map_err(to_py_err)?;
        to_json(&outcome.table.records)
    }

    fn summary(&self, index: &str) -> PyResult<String> {
        to_json(&self.inner.summary(index).map_err(to_py_err)?)
    }

    #[pyo3(signature = (index, group_by="block"))]
    fn breakdown(&self, index: &str, group_by: &str) -> PyResult<String> {
        let key = GroupKey::parse(group_by).ok_or_else(|| {
            pyo3::exceptions::PyValueError::new_err(format!(
                "Invalid group_by: {}. Must be 'block' or 'flight_date'",
                group_by
            ))
        })?;
        to_json(&self.inner.breakdown(index, key).map_err(to_py_err)?)
    }

    /// Compare two flights; without dates the first two flights are used
    #[pyo3(signature = (index, date_before=None, date_after=None))]
    fn compare(&self, index: &str, date_before: Option<&str>, date_after: Option<&str>) -> PyResult<String> {
        match (date_before, date_after) {
            (Some(before), Some(after)) => {
                to_json(&self.inner.compare(index, before, after).map_err(to_py_err)?)
            }
            _ => to_json(&self.inner.compare_first(index).map_err(to_py_err)?),
        }
    }

    fn insights(&self, index: &str) -> PyResult<String> {
        to_json(&self.inner.insights(index).map_err(to_py_err)?)
    }

    fn surface(&self) -> PyResult<String> {
        to_json(&self.inner.surface().map_err(to_py_err)?)
    }

    fn block_table(&self, index: &str) -> PyResult<String> {
        to_json(&self.inner.block_table(index).map_err(to_py_err)?)
    }

    fn zone_summary(&self, index: &str) -> PyResult<String> {
        to_json(&self.inner.zone_summary(index))
    }

    fn export_points(&self, path: PathBuf) -> PyResult<()> {
        self.inner.export_points(&path).map_err(to_py_err)
    }

    fn export_block_table(&self, index: &str, path: PathBuf) -> PyResult<()> {
        self.inner.export_block_table(index, &path).map_err(to_py_err)
    }

    fn export_zone_summary(&self, index: &str, path: PathBuf) -> PyResult<()> {
        self.inner.export_zone_summary(index, &path).map_err(to_py_err)
    }
}

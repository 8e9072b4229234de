use pyo3::prelude::*;

use crate::classification::classify;
use crate::core::catalog;
use crate::core::classes::ClassScheme;

use super::to_json;

/// Classify a code or label under a scheme ("five" or "seven")
#[pyfunction]
#[pyo3(signature = (value, scheme="five"))]
pub fn classify_label(value: Option<&str>, scheme: &str) -> PyResult<String> {
    let scheme = ClassScheme::parse(scheme).ok_or_else(|| {
        pyo3::exceptions::PyValueError::new_err(format!(
            "Invalid scheme: {}. Must be 'five' or 'seven'",
            scheme
        ))
    })?;
    Ok(classify(value, scheme).label().to_string())
}

/// The catalog of known indices as JSON
#[pyfunction]
pub fn index_catalog() -> PyResult<String> {
    let entries: Vec<_> = catalog::known_indices()
        .into_iter()
        .filter_map(catalog::index_info)
        .collect();
    to_json(&entries)
}

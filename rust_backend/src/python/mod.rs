//! Python bindings for the orchard analytics backend.
//!
//! Built only with the `python` feature. Results cross the boundary as JSON
//! strings so the dashboard can load them straight into its own tables.
//!
//! # Modules
//!
//! - [`session`]: the `Session` class wrapping a [`crate::session::SessionContext`]
//! - [`classification`]: stand-alone label classification and the index catalog
//!
//! # Python API
//!
//! ```python
//! import orchard_rust
//!
//! session = orchard_rust.Session("orchard.toml")
//! session.load_points("points.csv")
//! session.set_selection('{"species": "Cerezo"}')
//! summary = json.loads(session.summary("ndvi"))
//! ```

pub mod classification;
pub mod session;

pub use classification::*;
pub use session::*;

use pyo3::prelude::*;
use serde::Serialize;

use crate::error::ViewerError;

/// Serialize a result for Python
pub(crate) fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| {
        pyo3::exceptions::PyRuntimeError::new_err(format!("Failed to serialize result: {}", e))
    })
}

/// Map session errors onto Python exceptions
pub(crate) fn to_py_err(e: ViewerError) -> PyErr {
    match e {
        ViewerError::NotLoaded | ViewerError::UnknownIndex(_) => {
            pyo3::exceptions::PyValueError::new_err(e.to_string())
        }
        ViewerError::LoadError(_) | ViewerError::Config(_) => {
            pyo3::exceptions::PyIOError::new_err(e.to_string())
        }
        ViewerError::ExportError(_) => pyo3::exceptions::PyRuntimeError::new_err(e.to_string()),
    }
}

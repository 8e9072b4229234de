//! Orchard vegetation-index analytics.
//!
//! Loads per-tree index measurements from drone flights, classifies them into
//! ordinal health classes, filters them through cascading selections and
//! aggregates KPIs, breakdowns, flight comparisons and management-zone
//! summaries for a dashboard front end.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod classification;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod services;
pub mod session;
pub mod transformations;

#[cfg(feature = "python")]
pub mod python;

pub use error::{ConfigError, ViewerError, ViewerResult};
pub use session::SessionContext;

/// Orchard Rust Backend - index classification and aggregation for the orchard dashboards
#[cfg(feature = "python")]
#[pymodule]
fn orchard_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PySession>()?;

    m.add_function(wrap_pyfunction!(python::classify_label, m)?)?;
    m.add_function(wrap_pyfunction!(python::index_catalog, m)?)?;

    Ok(())
}

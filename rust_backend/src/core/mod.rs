//! Core domain models for orchard index analysis.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: tree records, polygon attributes, health classes and the schema
//! descriptor of a loaded table.

pub mod catalog;
pub mod classes;
pub mod domain;
pub mod schema;

pub use classes::{ClassScheme, HealthClass, ZoneLevel};
pub use domain::{BlockPolygon, PointRecord, PointTable, ZoneRecord};
pub use schema::{Attribute, IndexColumns, PointSchema};

//! Parsers for orchard data files.
//!
//! This module turns the delimited tables exported from the GIS layers into
//! typed records.
//!
//! # Parsers
//!
//! - [`csv_parser`]: point tables, schema detection and classification
//! - [`polygon_parser`]: block and management-zone attribute tables
//! - [`dates`]: canonical flight-date strings
//!
//! # Example
//!
//! ```no_run
//! use orchard_rust::classification::Classifier;
//! use orchard_rust::config::ViewerConfig;
//! use orchard_rust::parsing::csv_parser::parse_points_csv;
//! use std::path::Path;
//!
//! let config = ViewerConfig::default();
//! let classifier = config.classifier().expect("valid break points");
//! let table = parse_points_csv(Path::new("points.csv"), &config, &classifier)
//!     .expect("Failed to parse points");
//! ```

pub mod csv_parser;
pub mod dates;
pub mod polygon_parser;


pub use dates::canonical_date;

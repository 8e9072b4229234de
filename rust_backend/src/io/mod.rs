//! Loading of input tables and export of results.
//!
//! Loaders combine parsing with classification and log what they found;
//! exports render points and summary tables as comma-delimited text.
//!
//! # Example
//!
//! ```no_run
//! use orchard_rust::config::ViewerConfig;
//! use orchard_rust::io::loaders::PointLoader;
//! use std::path::Path;
//!
//! let config = ViewerConfig::default();
//! let classifier = config.classifier().expect("valid break points");
//! let result = PointLoader::load_from_file(Path::new("points.csv"), &config, &classifier)
//!     .expect("Failed to load");
//! println!("Loaded {} points", result.num_points);
//! ```

pub mod export;
pub mod loaders;


pub use loaders::{PointLoadResult, PointLoader, PolygonLoader};

//! Row-set transformations applied before aggregation.
//!
//! # Modules
//!
//! - [`filtering`]: cascading categorical filter (crop, flight date, species,
//!   variety, block set)
//!
//! # Example
//!
//! ```no_run
//! use orchard_rust::core::domain::PointTable;
//! use orchard_rust::transformations::{apply_cascade, Choice, FilterSelection};
//!
//! # fn example(table: PointTable) {
//! let selection = FilterSelection {
//!     species: Choice::parse("Cerezo"),
//!     ..Default::default()
//! };
//! let outcome = apply_cascade(&table, &selection);
//! println!("{} points after filtering", outcome.table.len());
//! # }
//! ```

pub mod filtering;

pub use filtering::{
    apply_cascade, filter_by_attribute, filter_by_blocks, filter_by_flight_date, Choice,
    FilterOutcome, FilterSelection, StageOptions, STAGE_ORDER,
};

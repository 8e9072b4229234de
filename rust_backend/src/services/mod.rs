//! Service layer: aggregations computed over a filtered point table.
//!
//! These services sit between the session and the presentation layer. Each
//! one is a pure function of its inputs and returns serde-serializable results.
//!
//! # Modules
//!
//! - [`summary`]: KPIs and class distribution of one index
//! - [`breakdown`]: per-block or per-flight statistics with deviations
//! - [`compare`]: two-flight comparison and trend
//! - [`zones`]: management-zone area summary
//! - [`insights`]: status, weak blocks and recommendations
//! - [`surface`]: planted surface and the block table

pub mod breakdown;
pub mod compare;
pub mod insights;
pub mod summary;
pub mod surface;
pub mod zones;

pub use breakdown::{breakdown, Breakdown, GroupKey, GroupStats};
pub use compare::{compare_first_flights, compare_flights, BlockChange, ClassShare, FlightComparison, Trend};
pub use insights::{build_insights, HealthStatus, Insights, UnderperformingBlock};
pub use summary::{describe, summarize, ClassCount, HealthSplit, IndexSummary, ValueStats};
pub use surface::{block_table, surface_info, BlockRow, SurfaceInfo};
pub use zones::{summarize_zones, ZoneLevelSummary, ZoneSummary};

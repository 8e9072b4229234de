//! Per-group statistics of one index (by block or by flight).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::classes::ClassScheme;
use crate::core::domain::{PointRecord, PointTable};
use crate::core::schema::Attribute;
use crate::services::summary::{describe, index_values, HealthSplit, ValueStats};

/// Column a breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Block,
    FlightDate,
}

impl GroupKey {
    /// Parse a group-by name (`block`, `flight_date`, or the dataset's column names).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "block" | "cuartel" => Some(GroupKey::Block),
            "flight_date" | "date" | "fecha_vuelo" => Some(GroupKey::FlightDate),
            _ => None,
        }
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            GroupKey::Block => Attribute::Block,
            GroupKey::FlightDate => Attribute::FlightDate,
        }
    }
}

/// Statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: String,
    pub rows: usize,
    pub stats: ValueStats,
    pub healthy_fraction: f64,
    pub critical_fraction: f64,
    /// Group mean minus overall mean.
    pub deviation: Option<f64>,
    /// Deviation relative to the overall mean; `None` when that mean is zero.
    pub deviation_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub index: String,
    pub group_by: GroupKey,
    pub overall_mean: Option<f64>,
    /// Sorted by key.
    pub groups: Vec<GroupStats>,
}

/// `value / reference * 100`, undefined for a zero or missing reference.
pub fn percent_change(delta: Option<f64>, reference: Option<f64>) -> Option<f64> {
    match (delta, reference) {
        (Some(d), Some(r)) if r != 0.0 => Some(d / r * 100.0),
        _ => None,
    }
}

/// Rows grouped by a key attribute; rows with no value for the key are left out.
pub fn group_rows<'a>(table: &'a PointTable, key: GroupKey) -> BTreeMap<String, Vec<&'a PointRecord>> {
    let mut groups: BTreeMap<String, Vec<&PointRecord>> = BTreeMap::new();
    if !table.schema.has(key.attribute()) {
        return groups;
    }
    for record in &table.records {
        if let Some(value) = record.attribute(key.attribute()) {
            groups.entry(value.to_string()).or_default().push(record);
        }
    }
    groups
}

/// Break `index` down by `key`.
///
/// A table without the key column yields an empty breakdown.
pub fn breakdown(table: &PointTable, index: &str, key: GroupKey, scheme: ClassScheme) -> Breakdown {
    let overall_mean = describe(&index_values(&table.records, index)).mean;

    let groups = group_rows(table, key)
        .into_iter()
        .map(|(name, rows)| {
            let stats = describe(&index_values(rows.iter().copied(), index));
            let split = HealthSplit::from_classes(rows.iter().map(|r| r.class(index)), scheme);
            let deviation = stats.mean.zip(overall_mean).map(|(g, o)| g - o);
            GroupStats {
                key: name,
                rows: rows.len(),
                deviation_pct: percent_change(deviation, overall_mean),
                deviation,
                healthy_fraction: split.healthy_fraction(),
                critical_fraction: split.critical_fraction(),
                stats,
            }
        })
        .collect();

    Breakdown {
        index: index.to_string(),
        group_by: key,
        overall_mean,
        groups,
    }
}

//! Area and tree-count summary of management zones.

use serde::Serialize;

use crate::core::classes::ZoneLevel;
use crate::core::domain::ZoneRecord;
use crate::parsing::dates::canonical_date;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneLevelSummary {
    pub level: ZoneLevel,
    pub label: String,
    pub zone_count: usize,
    pub area_ha: f64,
    pub tree_count: u64,
    /// Share of the summed area; 0 when the total is 0.
    pub area_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub index: String,
    pub flight_date: Option<String>,
    pub total_area_ha: f64,
    pub total_trees: u64,
    /// Always the three levels, low to high.
    pub levels: Vec<ZoneLevelSummary>,
}

impl ZoneSummary {
    pub fn level(&self, level: ZoneLevel) -> Option<&ZoneLevelSummary> {
        self.levels.iter().find(|l| l.level == level)
    }
}

/// Zones of one index, optionally restricted to a flight and a block set.
///
/// Zones that carry no date (or no block) are not excluded by the date (or
/// block) restriction.
pub fn select_zones<'a>(
    zones: &'a [ZoneRecord],
    index: &str,
    flight_date: Option<&str>,
    blocks: &[String],
) -> Vec<&'a ZoneRecord> {
    let index = index.to_lowercase();
    let wanted_date = flight_date.and_then(canonical_date);

    zones
        .iter()
        .filter(|z| z.index == index)
        .filter(|z| match (&wanted_date, &z.flight_date) {
            (Some(wanted), Some(date)) => wanted == date,
            _ => true,
        })
        .filter(|z| match &z.block {
            Some(block) if !blocks.is_empty() => blocks.contains(block),
            _ => true,
        })
        .collect()
}

/// Group the selected zones by level and sum area and trees.
pub fn summarize_zones(
    zones: &[ZoneRecord],
    index: &str,
    flight_date: Option<&str>,
    blocks: &[String],
) -> ZoneSummary {
    let selected = select_zones(zones, index, flight_date, blocks);
    let total_area_ha = selected.iter().fold(0.0, |acc, z| acc + z.area_ha);
    let total_trees: u64 = selected.iter().filter_map(|z| z.tree_count).sum();

    let levels = ZoneLevel::ALL
        .iter()
        .map(|level| {
            let members: Vec<&&ZoneRecord> = selected.iter().filter(|z| z.level == *level).collect();
            let area_ha = members.iter().fold(0.0, |acc, z| acc + z.area_ha);
            ZoneLevelSummary {
                level: *level,
                label: level.label().to_string(),
                zone_count: members.len(),
                area_ha,
                tree_count: members.iter().filter_map(|z| z.tree_count).sum(),
                area_pct: if total_area_ha > 0.0 {
                    area_ha / total_area_ha * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    ZoneSummary {
        index: index.to_lowercase(),
        flight_date: flight_date.and_then(canonical_date),
        total_area_ha,
        total_trees,
        levels,
    }
}

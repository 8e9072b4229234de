//! Planted surface and the per-block summary table.

use serde::Serialize;

use crate::core::classes::ClassScheme;
use crate::core::domain::{BlockPolygon, PointRecord, PointTable};
use crate::core::schema::Attribute;
use crate::services::summary::{describe, index_values, HealthSplit};

/// Area covered by the selected blocks and the resulting planting density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceInfo {
    pub total_area_ha: f64,
    pub tree_count: usize,
    /// `None` when the matched polygons have no area.
    pub trees_per_ha: Option<f64>,
    pub block_count: usize,
}

/// Surface of the polygons matching `selected_blocks`, or of the blocks that
/// appear in `points` when the selection is empty.
///
/// Returns `None` when no polygon matches.
pub fn surface_info(
    points: &PointTable,
    polygons: &[BlockPolygon],
    selected_blocks: &[String],
) -> Option<SurfaceInfo> {
    let wanted: Vec<String> = if selected_blocks.is_empty() {
        points.distinct(Attribute::Block)
    } else {
        selected_blocks.to_vec()
    };

    let matched: Vec<&BlockPolygon> = polygons
        .iter()
        .filter(|p| wanted.contains(&p.name))
        .collect();
    if matched.is_empty() {
        return None;
    }

    let total_area_ha = matched.iter().filter_map(|p| p.area_ha).fold(0.0, |acc, a| acc + a);
    let tree_count = points.len();

    Some(SurfaceInfo {
        total_area_ha,
        tree_count,
        trees_per_ha: (total_area_ha > 0.0).then(|| tree_count as f64 / total_area_ha),
        block_count: matched.len(),
    })
}

/// One line of the block summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRow {
    pub block: String,
    /// Set only when the table spans two or more flights.
    pub flight_date: Option<String>,
    pub species: Option<String>,
    pub variety: Option<String>,
    pub planting_year: Option<String>,
    pub area_ha: Option<f64>,
    pub trees: usize,
    pub trees_per_ha: Option<f64>,
    pub mean: Option<f64>,
    pub healthy_pct: f64,
}

fn block_row(
    block: &str,
    flight_date: Option<&str>,
    rows: &[&PointRecord],
    polygon: Option<&BlockPolygon>,
    index: &str,
    scheme: ClassScheme,
) -> BlockRow {
    let area_ha = polygon.and_then(|p| p.area_ha).filter(|a| *a > 0.0);
    let trees = rows.len();
    let split = HealthSplit::from_classes(rows.iter().map(|r| r.class(index)), scheme);

    BlockRow {
        block: block.to_string(),
        flight_date: flight_date.map(str::to_string),
        species: rows.iter().find_map(|r| r.species.clone()),
        variety: rows.iter().find_map(|r| r.variety.clone()),
        planting_year: polygon.and_then(|p| p.planting_year.clone()),
        area_ha,
        trees,
        trees_per_ha: area_ha.map(|a| trees as f64 / a),
        mean: describe(&index_values(rows.iter().copied(), index)).mean,
        healthy_pct: split.healthy_fraction() * 100.0,
    }
}

/// One row per block present in `points`, split per flight when the table
/// holds two or more flights. Sorted by block, then flight.
pub fn block_table(
    points: &PointTable,
    polygons: &[BlockPolygon],
    index: &str,
    scheme: ClassScheme,
) -> Vec<BlockRow> {
    if !points.schema.has(Attribute::Block) {
        return Vec::new();
    }

    let dates = points.flight_dates();
    let per_flight = dates.len() >= 2;
    let polygon_of = |block: &str| polygons.iter().find(|p| p.name == block);

    let mut table = Vec::new();
    for block in points.distinct(Attribute::Block) {
        let in_block: Vec<&PointRecord> = points
            .records
            .iter()
            .filter(|r| r.block.as_deref() == Some(block.as_str()))
            .collect();

        if per_flight {
            for date in &dates {
                let rows: Vec<&PointRecord> = in_block
                    .iter()
                    .copied()
                    .filter(|r| r.flight_date.as_deref() == Some(date.as_str()))
                    .collect();
                if rows.is_empty() {
                    continue;
                }
                table.push(block_row(
                    &block,
                    Some(date.as_str()),
                    &rows,
                    polygon_of(block.as_str()),
                    index,
                    scheme,
                ));
            }
        } else {
            table.push(block_row(&block, None, &in_block, polygon_of(block.as_str()), index, scheme));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classes::HealthClass;
    use crate::core::schema::{IndexColumns, PointSchema};

    fn points(rows: &[(&str, &str, f64, HealthClass)]) -> PointTable {
        let schema = PointSchema {
            has_block: true,
            has_flight_date: true,
            has_species: true,
            indices: vec![IndexColumns {
                name: "ndvi".to_string(),
                value_column: Some("ndvi".to_string()),
                class_column: None,
            }],
            ..Default::default()
        };
        let records = rows
            .iter()
            .map(|(block, date, value, class)| {
                let mut record = PointRecord {
                    block: Some(block.to_string()),
                    flight_date: Some(date.to_string()),
                    species: Some("Cerezo".to_string()),
                    ..Default::default()
                };
                record.values.insert("ndvi".to_string(), Some(*value));
                record.classes.insert("ndvi".to_string(), *class);
                record
            })
            .collect();
        PointTable::new(schema, records)
    }

    fn polygon(name: &str, area: Option<f64>) -> BlockPolygon {
        BlockPolygon {
            name: name.to_string(),
            area_ha: area,
            species: Some("Cerezo".to_string()),
            variety: None,
            planting_year: Some("2015".to_string()),
        }
    }

    #[test]
    fn test_surface_of_blocks_in_points() {
        let table = points(&[
            ("C1", "2023-10-15", 0.5, HealthClass::Medium),
            ("C1", "2023-10-15", 0.7, HealthClass::High),
            ("C2", "2023-10-15", 0.6, HealthClass::MediumHigh),
        ]);
        let polygons = vec![polygon("C1", Some(1.0)), polygon("C2", Some(0.5)), polygon("C3", Some(9.0))];

        let info = surface_info(&table, &polygons, &[]).unwrap();
        assert!((info.total_area_ha - 1.5).abs() < 1e-12);
        assert_eq!(info.tree_count, 3);
        assert!((info.trees_per_ha.unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(info.block_count, 2);

        let selected = surface_info(&table, &polygons, &["C3".to_string()]).unwrap();
        assert_eq!(selected.block_count, 1);
    }

    #[test]
    fn test_surface_without_match_or_area() {
        let table = points(&[("C1", "2023-10-15", 0.5, HealthClass::Medium)]);
        assert!(surface_info(&table, &[polygon("X", Some(1.0))], &[]).is_none());

        let info = surface_info(&table, &[polygon("C1", None)], &[]).unwrap();
        assert_eq!(info.trees_per_ha, None);
        assert!(info.total_area_ha.is_sign_positive());
    }

    #[test]
    fn test_block_table_single_flight() {
        let table = points(&[
            ("C2", "2023-10-15", 0.6, HealthClass::MediumHigh),
            ("C1", "2023-10-15", 0.4, HealthClass::Low),
            ("C1", "2023-10-15", 0.8, HealthClass::High),
        ]);
        let rows = block_table(&table, &[polygon("C1", Some(2.0))], "ndvi", ClassScheme::Five);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].block, "C1");
        assert_eq!(rows[0].flight_date, None);
        assert_eq!(rows[0].planting_year.as_deref(), Some("2015"));
        assert_eq!(rows[0].trees_per_ha, Some(1.0));
        assert!((rows[0].mean.unwrap() - 0.6).abs() < 1e-12);
        assert!((rows[0].healthy_pct - 50.0).abs() < 1e-12);
        assert_eq!(rows[1].area_ha, None);
    }

    #[test]
    fn test_block_table_per_flight() {
        let table = points(&[
            ("C1", "2023-11-20", 0.6, HealthClass::MediumHigh),
            ("C1", "2023-10-15", 0.4, HealthClass::Low),
            ("C2", "2023-11-20", 0.7, HealthClass::High),
        ]);
        let rows = block_table(&table, &[], "ndvi", ClassScheme::Five);
        let keys: Vec<(&str, Option<&str>)> = rows
            .iter()
            .map(|r| (r.block.as_str(), r.flight_date.as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("C1", Some("2023-10-15")),
                ("C1", Some("2023-11-20")),
                ("C2", Some("2023-11-20")),
            ]
        );
    }
}

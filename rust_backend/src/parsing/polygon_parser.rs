//! Parsers for the attribute tables of block and management-zone polygons.
//!
//! Geometry stays in the vector files; these tables carry the attributes the
//! summaries need (area, tree count, zone level).

use anyhow::{bail, Result};
use polars::prelude::DataFrame;
use std::path::Path;

use crate::config::{PolygonColumns, ZoneColumns};
use crate::core::classes::ZoneLevel;
use crate::core::domain::{BlockPolygon, ZoneRecord};
use crate::parsing::csv_parser::{
    column_names, float_column, read_csv_frame, read_csv_frame_from_str, string_column,
};
use crate::parsing::dates::canonical_date;

fn optional_text(df: &DataFrame, columns: &[String], name: &str) -> Result<Vec<Option<String>>> {
    if columns.iter().any(|c| c == name) {
        string_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn optional_number(df: &DataFrame, columns: &[String], name: &str) -> Result<Vec<Option<f64>>> {
    if columns.iter().any(|c| c == name) {
        float_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Convert a block attribute table to polygons; rows without a name are dropped.
pub fn dataframe_to_blocks(df: &DataFrame, names: &PolygonColumns) -> Result<Vec<BlockPolygon>> {
    let columns = column_names(df);
    if !columns.iter().any(|c| c == &names.name) {
        bail!("Block table has no '{}' column", names.name);
    }

    let block_names = string_column(df, &names.name)?;
    let areas = optional_number(df, &columns, &names.area)?;
    let species = optional_text(df, &columns, &names.species)?;
    let varieties = optional_text(df, &columns, &names.variety)?;
    let years = optional_text(df, &columns, &names.year)?;

    let polygons = (0..df.height())
        .filter_map(|row| {
            let name = block_names[row].clone()?;
            Some(BlockPolygon {
                name,
                area_ha: areas[row],
                species: species[row].clone(),
                variety: varieties[row].clone(),
                planting_year: years[row].clone(),
            })
        })
        .collect();

    Ok(polygons)
}

/// Convert a zone attribute table to zone records.
///
/// Rows with a level outside 1..=3, no index name or no area are skipped with
/// a warning.
pub fn dataframe_to_zones(df: &DataFrame, names: &ZoneColumns) -> Result<Vec<ZoneRecord>> {
    let columns = column_names(df);
    for required in [&names.index, &names.level, &names.area] {
        if !columns.iter().any(|c| c == required) {
            bail!("Zone table has no '{}' column", required);
        }
    }

    let indices = string_column(df, &names.index)?;
    let levels = float_column(df, &names.level)?;
    let areas = float_column(df, &names.area)?;
    let trees = optional_number(df, &columns, &names.trees)?;
    let dates = optional_text(df, &columns, &names.flight_date)?;
    let blocks = optional_text(df, &columns, &names.block)?;

    let mut zones = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for row in 0..df.height() {
        let level = levels[row]
            .filter(|l| l.fract() == 0.0)
            .and_then(|l| ZoneLevel::from_code(l as i64));
        match (indices[row].as_ref(), level, areas[row]) {
            (Some(index), Some(level), Some(area_ha)) => zones.push(ZoneRecord {
                index: index.to_lowercase(),
                level,
                area_ha,
                tree_count: trees[row].filter(|t| *t >= 0.0).map(|t| t.round() as u64),
                flight_date: dates[row].as_deref().and_then(canonical_date),
                block: blocks[row].clone(),
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} zone rows with missing index, level or area", skipped);
    }

    Ok(zones)
}

/// Parse a block attribute CSV file
pub fn parse_blocks_csv(path: &Path, names: &PolygonColumns) -> Result<Vec<BlockPolygon>> {
    dataframe_to_blocks(&read_csv_frame(path)?, names)
}

/// Parse block attribute CSV text
pub fn parse_blocks_csv_str(csv: &str, names: &PolygonColumns) -> Result<Vec<BlockPolygon>> {
    dataframe_to_blocks(&read_csv_frame_from_str(csv)?, names)
}

/// Parse a zone attribute CSV file
pub fn parse_zones_csv(path: &Path, names: &ZoneColumns) -> Result<Vec<ZoneRecord>> {
    dataframe_to_zones(&read_csv_frame(path)?, names)
}

/// Parse zone attribute CSV text
pub fn parse_zones_csv_str(csv: &str, names: &ZoneColumns) -> Result<Vec<ZoneRecord>> {
    dataframe_to_zones(&read_csv_frame_from_str(csv)?, names)
}

//! Delimited-text exports of points and summary tables.
//!
//! Index values are written with 3 decimals, percentages with 1 decimal and
//! undefined percentages as `N/A`.

use anyhow::{Context, Result};
use chrono::Local;
use polars::io::SerWriter;
use polars::prelude::{Column, CsvWriter, DataFrame, NamedFrom};
use polars::series::Series;
use std::fs::File;
use std::path::Path;

use crate::core::domain::PointTable;
use crate::core::schema::Attribute;
use crate::services::breakdown::{Breakdown, GroupKey};
use crate::services::surface::BlockRow;
use crate::services::zones::ZoneSummary;

/// Placeholder for percentages that cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_default()
}

pub fn format_pct(pct: Option<f64>) -> String {
    pct.map(|p| format!("{:.1}", p))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_coordinate(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Build a frame of text columns, in order. Empty cells become nulls.
fn text_frame(columns: Vec<(String, Vec<String>)>) -> Result<DataFrame> {
    let columns: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            let cells: Vec<Option<String>> = values
                .into_iter()
                .map(|v| (!v.is_empty()).then_some(v))
                .collect();
            Series::new(name.into(), cells).into()
        })
        .collect();
    DataFrame::new(columns).context("Failed to build export frame")
}

/// Points with every attribute the table carries and, per index, the value
/// and class label.
pub fn points_frame(table: &PointTable) -> Result<DataFrame> {
    let records = &table.records;
    let schema = &table.schema;
    let mut columns: Vec<(String, Vec<String>)> = Vec::new();

    if schema.has_id {
        columns.push(("id".to_string(), records.iter().map(|r| text(r.id.as_deref())).collect()));
    }
    for attribute in [
        Attribute::Block,
        Attribute::Species,
        Attribute::Variety,
        Attribute::Crop,
        Attribute::FlightDate,
    ] {
        if schema.has(attribute) {
            columns.push((
                attribute.label().to_string(),
                records.iter().map(|r| text(r.attribute(attribute))).collect(),
            ));
        }
    }
    if schema.has_position {
        columns.push(("lat".to_string(), records.iter().map(|r| format_coordinate(r.lat)).collect()));
        columns.push(("lon".to_string(), records.iter().map(|r| format_coordinate(r.lon)).collect()));
    }
    if schema.has_height {
        columns.push((
            "height_m".to_string(),
            records.iter().map(|r| r.height_m.map(|h| format!("{:.2}", h)).unwrap_or_default()).collect(),
        ));
    }
    for index in &schema.indices {
        if index.value_column.is_some() {
            columns.push((
                index.name.clone(),
                records.iter().map(|r| format_value(r.value(&index.name))).collect(),
            ));
        }
        columns.push((
            format!("{}_class", index.name),
            records.iter().map(|r| r.class(&index.name).label().to_string()).collect(),
        ));
    }

    text_frame(columns)
}

/// The block summary table.
pub fn block_table_frame(rows: &[BlockRow], index: &str) -> Result<DataFrame> {
    let mut columns = vec![("block".to_string(), rows.iter().map(|r| r.block.clone()).collect())];
    if rows.iter().any(|r| r.flight_date.is_some()) {
        columns.push((
            "flight_date".to_string(),
            rows.iter().map(|r| text(r.flight_date.as_deref())).collect(),
        ));
    }
    columns.extend([
        ("species".to_string(), rows.iter().map(|r| text(r.species.as_deref())).collect()),
        ("variety".to_string(), rows.iter().map(|r| text(r.variety.as_deref())).collect()),
        ("year".to_string(), rows.iter().map(|r| text(r.planting_year.as_deref())).collect()),
        (
            "area_ha".to_string(),
            rows.iter().map(|r| r.area_ha.map(|a| format!("{:.1}", a)).unwrap_or_default()).collect(),
        ),
        ("trees".to_string(), rows.iter().map(|r| r.trees.to_string()).collect()),
        (
            "trees_per_ha".to_string(),
            rows.iter().map(|r| r.trees_per_ha.map(|d| format!("{:.0}", d)).unwrap_or_default()).collect(),
        ),
        (format!("{}_mean", index), rows.iter().map(|r| format_value(r.mean)).collect()),
        ("healthy_pct".to_string(), rows.iter().map(|r| format_pct(Some(r.healthy_pct))).collect()),
    ]);
    text_frame(columns)
}

/// A block or flight breakdown.
pub fn breakdown_frame(breakdown: &Breakdown) -> Result<DataFrame> {
    let key = match breakdown.group_by {
        GroupKey::Block => "block",
        GroupKey::FlightDate => "flight_date",
    };
    let groups = &breakdown.groups;
    text_frame(vec![
        (key.to_string(), groups.iter().map(|g| g.key.clone()).collect()),
        ("rows".to_string(), groups.iter().map(|g| g.rows.to_string()).collect()),
        ("mean".to_string(), groups.iter().map(|g| format_value(g.stats.mean)).collect()),
        ("std_dev".to_string(), groups.iter().map(|g| format_value(g.stats.std_dev)).collect()),
        ("min".to_string(), groups.iter().map(|g| format_value(g.stats.min)).collect()),
        ("max".to_string(), groups.iter().map(|g| format_value(g.stats.max)).collect()),
        (
            "healthy_pct".to_string(),
            groups.iter().map(|g| format_pct(Some(g.healthy_fraction * 100.0))).collect(),
        ),
        ("deviation".to_string(), groups.iter().map(|g| format_value(g.deviation)).collect()),
        ("deviation_pct".to_string(), groups.iter().map(|g| format_pct(g.deviation_pct)).collect()),
    ])
}

/// Area per management-zone level.
pub fn zone_summary_frame(summary: &ZoneSummary) -> Result<DataFrame> {
    let levels = &summary.levels;
    text_frame(vec![
        ("level".to_string(), levels.iter().map(|l| l.level.code().to_string()).collect()),
        ("label".to_string(), levels.iter().map(|l| l.label.clone()).collect()),
        ("zones".to_string(), levels.iter().map(|l| l.zone_count.to_string()).collect()),
        ("area_ha".to_string(), levels.iter().map(|l| format!("{:.2}", l.area_ha)).collect()),
        ("trees".to_string(), levels.iter().map(|l| l.tree_count.to_string()).collect()),
        ("area_pct".to_string(), levels.iter().map(|l| format_pct(Some(l.area_pct))).collect()),
    ])
}

/// Write a frame to a CSV file
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    log::info!("Exported {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Write a frame to a CSV string
pub fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .context("Failed to write CSV to string")?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}

/// Timestamped default file name, e.g. `ndvi_points_20231015_093000.csv`.
pub fn default_export_name(prefix: &str) -> String {
    format!("{}_{}.csv", prefix, Local::now().format("%Y%m%d_%H%M%S"))
}

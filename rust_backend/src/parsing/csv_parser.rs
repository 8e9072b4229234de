use anyhow::{Context, Result};
use polars::io::SerReader;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use crate::classification::Classifier;
use crate::config::ViewerConfig;
use crate::core::domain::{PointRecord, PointTable};
use crate::core::schema::{IndexColumns, PointSchema};
use crate::parsing::dates::canonical_date;

/// Read options shared by every table: all columns are read as text and typed
/// per column afterwards, so one malformed cell never fails the whole file.
fn text_read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Parse a CSV file into a Polars DataFrame
pub fn read_csv_frame(csv_path: &Path) -> Result<DataFrame> {
    text_read_options()
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV into DataFrame: {}", csv_path.display()))
}

/// Parse CSV text into a Polars DataFrame
pub fn read_csv_frame_from_str(csv: &str) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(csv.as_bytes()))
        .with_options(text_read_options())
        .finish()
        .context("Failed to parse CSV text into DataFrame")
}

/// Column names of a DataFrame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a column as trimmed text; blank cells become `None`.
///
/// Non-text columns are cast to their string form, so a frame built with
/// typed columns still yields comparable text.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)?
        .cast(&DataType::String)
        .with_context(|| format!("Failed to read column '{}' as text", name))?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    Ok(values)
}

/// Read a column as f64; unparseable cells become `None`.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = string_column(df, name)?
        .into_iter()
        .map(|v| {
            v.and_then(|s| s.parse::<f64>().ok())
                .filter(|x| x.is_finite())
        })
        .collect();
    Ok(values)
}

fn optional_strings(df: &DataFrame, name: &str, present: bool) -> Result<Option<Vec<Option<String>>>> {
    if present {
        string_column(df, name).map(Some)
    } else {
        Ok(None)
    }
}

fn optional_floats(df: &DataFrame, name: &str, present: bool) -> Result<Option<Vec<Option<f64>>>> {
    if present {
        float_column(df, name).map(Some)
    } else {
        Ok(None)
    }
}

fn cell<T: Clone>(column: &Option<Vec<Option<T>>>, row: usize) -> Option<T> {
    column.as_ref().and_then(|values| values[row].clone())
}

/// Work out which optional columns and which indices a table carries.
pub fn detect_schema(columns: &[String], config: &ViewerConfig) -> PointSchema {
    let has = |name: &String| columns.contains(name);
    let names = &config.columns;

    let indices = config
        .dataset
        .indices
        .iter()
        .filter_map(|index| {
            let index = index.to_lowercase();
            let value_column = columns.iter().find(|c| c.to_lowercase() == index).cloned();
            let class_column = config.dataset.class_suffixes.iter().find_map(|suffix| {
                [format!("{}{}", index, suffix), format!("{}{}", index.to_uppercase(), suffix)]
                    .into_iter()
                    .find(|candidate| has(candidate))
            });
            if value_column.is_none() && class_column.is_none() {
                return None;
            }
            Some(IndexColumns {
                name: index,
                value_column,
                class_column,
            })
        })
        .collect();

    PointSchema {
        has_id: has(&names.id),
        has_position: has(&names.lat) && has(&names.lon),
        has_block: has(&names.block),
        has_species: has(&names.species),
        has_variety: has(&names.variety),
        has_crop: has(&names.crop),
        has_flight_date: has(&names.flight_date),
        has_height: has(&names.height),
        indices,
    }
}

/// Convert a Polars DataFrame to classified point records
pub fn dataframe_to_points(
    df: &DataFrame,
    config: &ViewerConfig,
    classifier: &Classifier,
) -> Result<PointTable> {
    let schema = detect_schema(&column_names(df), config);
    let names = &config.columns;
    let height = df.height();

    let ids = optional_strings(df, &names.id, schema.has_id)?;
    let blocks = optional_strings(df, &names.block, schema.has_block)?;
    let species = optional_strings(df, &names.species, schema.has_species)?;
    let varieties = optional_strings(df, &names.variety, schema.has_variety)?;
    let crops = optional_strings(df, &names.crop, schema.has_crop)?;
    let dates = optional_strings(df, &names.flight_date, schema.has_flight_date)?;
    let lats = optional_floats(df, &names.lat, schema.has_position)?;
    let lons = optional_floats(df, &names.lon, schema.has_position)?;
    let heights = optional_floats(df, &names.height, schema.has_height)?;

    let mut index_values = Vec::with_capacity(schema.indices.len());
    for index in &schema.indices {
        let values = match &index.value_column {
            Some(name) => Some(float_column(df, name)?),
            None => None,
        };
        let classes = match &index.class_column {
            Some(name) => Some(string_column(df, name)?),
            None => None,
        };
        index_values.push((index.name.clone(), values, classes));
    }

    let mut records = Vec::with_capacity(height);
    for row in 0..height {
        let mut values = BTreeMap::new();
        let mut classes = BTreeMap::new();
        for (name, value_col, class_col) in &index_values {
            let value = cell(value_col, row);
            let class_cell = class_col.as_ref().map(|col| col[row].as_deref());
            if value_col.is_some() {
                values.insert(name.clone(), value);
            }
            classes.insert(name.clone(), classifier.classify_point(name, class_cell, value));
        }

        records.push(PointRecord {
            id: cell(&ids, row),
            lat: cell(&lats, row),
            lon: cell(&lons, row),
            block: cell(&blocks, row),
            species: cell(&species, row),
            variety: cell(&varieties, row),
            crop: cell(&crops, row),
            flight_date: cell(&dates, row).and_then(|d| canonical_date(&d)),
            height_m: cell(&heights, row),
            values,
            classes,
        });
    }

    log::debug!(
        "Parsed {} points with indices {:?}",
        records.len(),
        schema.index_names()
    );

    Ok(PointTable::new(schema, records))
}

/// Parse a point CSV file into classified records
pub fn parse_points_csv(
    csv_path: &Path,
    config: &ViewerConfig,
    classifier: &Classifier,
) -> Result<PointTable> {
    let df = read_csv_frame(csv_path)?;
    dataframe_to_points(&df, config, classifier)
        .with_context(|| format!("Failed to convert {} to points", csv_path.display()))
}

/// Parse point CSV text into classified records
pub fn parse_points_csv_str(
    csv: &str,
    config: &ViewerConfig,
    classifier: &Classifier,
) -> Result<PointTable> {
    let df = read_csv_frame_from_str(csv)?;
    dataframe_to_points(&df, config, classifier)
}

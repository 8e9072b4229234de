//! Domain records for drone-detected trees, block polygons and management zones.
//!
//! Records are built once from the input tables and never mutated afterwards;
//! filtering produces new tables of cloned records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classes::{HealthClass, ZoneLevel};
use super::schema::{Attribute, PointSchema};

/// One tree detected in a drone flight.
///
/// Categorical attributes are optional because the source table may lack the
/// column entirely (see [`PointSchema`]) or hold an empty cell for this tree.
/// `flight_date` is stored in canonical form so comparisons are plain string
/// equality.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub block: Option<String>,
    pub species: Option<String>,
    pub variety: Option<String>,
    pub crop: Option<String>,
    pub flight_date: Option<String>,
    pub height_m: Option<f64>,
    /// Raw index values keyed by index name (lower case).
    pub values: BTreeMap<String, Option<f64>>,
    /// Canonical class per index, filled by the classifier.
    pub classes: BTreeMap<String, HealthClass>,
}

impl PointRecord {
    /// Value of a categorical attribute, if present for this tree.
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Crop => self.crop.as_deref(),
            Attribute::FlightDate => self.flight_date.as_deref(),
            Attribute::Species => self.species.as_deref(),
            Attribute::Variety => self.variety.as_deref(),
            Attribute::Block => self.block.as_deref(),
        }
    }

    /// Index value, `None` when missing or not a finite number.
    pub fn value(&self, index: &str) -> Option<f64> {
        self.values
            .get(index)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Canonical class for an index; unclassified indices read as `NoData`.
    pub fn class(&self, index: &str) -> HealthClass {
        self.classes.get(index).copied().unwrap_or(HealthClass::NoData)
    }
}

/// The loaded point table together with its capability descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointTable {
    pub schema: PointSchema,
    pub records: Vec<PointRecord>,
}

impl PointTable {
    pub fn new(schema: PointSchema, records: Vec<PointRecord>) -> Self {
        Self { schema, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// New table sharing the schema, holding only the records matching `keep`.
    pub fn retain_copy<F>(&self, mut keep: F) -> PointTable
    where
        F: FnMut(&PointRecord) -> bool,
    {
        PointTable {
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Sorted distinct non-missing values of an attribute.
    pub fn distinct(&self, attribute: Attribute) -> Vec<String> {
        let mut values: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.attribute(attribute))
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        values
    }

    /// Distinct flight dates; empty when the table has no flight column.
    pub fn flight_dates(&self) -> Vec<String> {
        if !self.schema.has(Attribute::FlightDate) {
            return Vec::new();
        }
        self.distinct(Attribute::FlightDate)
    }
}

/// Boundary attributes of a management block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPolygon {
    pub name: String,
    pub area_ha: Option<f64>,
    pub species: Option<String>,
    pub variety: Option<String>,
    pub planting_year: Option<String>,
}

/// A management-zone polygon for one index (and possibly one flight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub index: String,
    pub level: ZoneLevel,
    pub area_ha: f64,
    pub tree_count: Option<u64>,
    pub flight_date: Option<String>,
    pub block: Option<String>,
}

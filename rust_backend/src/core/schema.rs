//! Capability descriptor of a loaded point table.
//!
//! The descriptor is computed once when the table is parsed and records which
//! optional columns exist. Pipeline stages consult it instead of probing column
//! names again.

use serde::{Deserialize, Serialize};

/// Categorical attribute a filter stage or a group-by can work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Crop,
    FlightDate,
    Species,
    Variety,
    Block,
}

impl Attribute {
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Crop => "crop",
            Attribute::FlightDate => "flight_date",
            Attribute::Species => "species",
            Attribute::Variety => "variety",
            Attribute::Block => "block",
        }
    }
}

/// Source columns feeding one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumns {
    /// Index name, lower case (`ndvi`, `lci`, ...).
    pub name: String,
    /// Column with the continuous value.
    pub value_column: Option<String>,
    /// Column with a precomputed class code or label.
    pub class_column: Option<String>,
}

/// Which optional fields the point table carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSchema {
    pub has_id: bool,
    pub has_position: bool,
    pub has_block: bool,
    pub has_species: bool,
    pub has_variety: bool,
    pub has_crop: bool,
    pub has_flight_date: bool,
    pub has_height: bool,
    pub indices: Vec<IndexColumns>,
}

impl PointSchema {
    pub fn has(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Crop => self.has_crop,
            Attribute::FlightDate => self.has_flight_date,
            Attribute::Species => self.has_species,
            Attribute::Variety => self.has_variety,
            Attribute::Block => self.has_block,
        }
    }

    pub fn index(&self, name: &str) -> Option<&IndexColumns> {
        self.indices.iter().find(|i| i.name == name)
    }

    /// Index carries raw values (needed for means and deviations).
    pub fn has_values(&self, name: &str) -> bool {
        self.index(name).is_some_and(|i| i.value_column.is_some())
    }

    pub fn index_names(&self) -> Vec<String> {
        self.indices.iter().map(|i| i.name.clone()).collect()
    }
}

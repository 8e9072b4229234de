//! Ordinal health classes and the schemes that select them.
//!
//! Every classified index value ends up as one [`HealthClass`]. Which classes
//! are legal depends on the active [`ClassScheme`]: the five-class scheme used by
//! the early dashboards, or the seven-class scheme used once the finer
//! Medium-Low / Very High levels were introduced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical health class of one tree for one index.
///
/// Variants are declared from the most severe to the healthiest so the derived
/// `Ord` follows the ordinal scale. `NoData` sorts last and is not part of any
/// scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthClass {
    VeryLow,
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
    NoData,
}

impl HealthClass {
    /// Display label used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            HealthClass::VeryLow => "Very Low",
            HealthClass::Low => "Low",
            HealthClass::MediumLow => "Medium-Low",
            HealthClass::Medium => "Medium",
            HealthClass::MediumHigh => "Medium-High",
            HealthClass::High => "High",
            HealthClass::VeryHigh => "Very High",
            HealthClass::NoData => "No data",
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, HealthClass::NoData)
    }
}

impl fmt::Display for HealthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const FIVE_CLASSES: [HealthClass; 5] = [
    HealthClass::VeryLow,
    HealthClass::Low,
    HealthClass::Medium,
    HealthClass::MediumHigh,
    HealthClass::High,
];

const SEVEN_CLASSES: [HealthClass; 7] = [
    HealthClass::VeryLow,
    HealthClass::Low,
    HealthClass::MediumLow,
    HealthClass::Medium,
    HealthClass::MediumHigh,
    HealthClass::High,
    HealthClass::VeryHigh,
];

/// Which ordinal label set a dataset is classified with.
///
/// Chosen once per dataset through configuration, never per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassScheme {
    #[default]
    Five,
    Seven,
}

impl ClassScheme {
    /// Parse a scheme name (`five`/`5` or `seven`/`7`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "five" | "5" => Some(ClassScheme::Five),
            "seven" | "7" => Some(ClassScheme::Seven),
            _ => None,
        }
    }

    /// Labels of the scheme ordered from code 1 upwards.
    pub fn classes(&self) -> &'static [HealthClass] {
        match self {
            ClassScheme::Five => &FIVE_CLASSES,
            ClassScheme::Seven => &SEVEN_CLASSES,
        }
    }

    /// Number of levels (the largest valid class code).
    pub fn size(&self) -> usize {
        self.classes().len()
    }

    pub fn contains(&self, class: HealthClass) -> bool {
        self.classes().contains(&class)
    }

    /// Label for a 1-based class code, `NoData` outside `1..=size`.
    pub fn from_code(&self, code: i64) -> HealthClass {
        if code < 1 {
            return HealthClass::NoData;
        }
        self.classes()
            .get((code - 1) as usize)
            .copied()
            .unwrap_or(HealthClass::NoData)
    }

    /// 1-based code of a class within this scheme.
    pub fn code_of(&self, class: HealthClass) -> Option<usize> {
        self.classes().iter().position(|c| *c == class).map(|i| i + 1)
    }

    /// The top two levels of the scheme.
    pub fn healthy_classes(&self) -> &'static [HealthClass] {
        let classes = self.classes();
        &classes[classes.len() - 2..]
    }

    /// The bottom two levels of the scheme.
    pub fn critical_classes(&self) -> &'static [HealthClass] {
        &self.classes()[..2]
    }

    /// Levels that are neither healthy nor critical.
    pub fn medium_classes(&self) -> &'static [HealthClass] {
        let classes = self.classes();
        &classes[2..classes.len() - 2]
    }

    pub fn is_healthy(&self, class: HealthClass) -> bool {
        self.healthy_classes().contains(&class)
    }

    pub fn is_critical(&self, class: HealthClass) -> bool {
        self.critical_classes().contains(&class)
    }
}

/// Level of a management zone polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl ZoneLevel {
    pub const ALL: [ZoneLevel; 3] = [ZoneLevel::Low, ZoneLevel::Medium, ZoneLevel::High];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ZoneLevel::Low),
            2 => Some(ZoneLevel::Medium),
            3 => Some(ZoneLevel::High),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoneLevel::Low => "Low",
            ZoneLevel::Medium => "Medium",
            ZoneLevel::High => "High",
        }
    }
}

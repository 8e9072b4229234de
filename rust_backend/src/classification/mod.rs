//! Classification of index values into canonical health classes.
//!
//! # Modules
//!
//! - [`rules`]: ordered rule list for codes and label text
//!
//! A [`Classifier`] binds the rule list to the scheme chosen for a dataset and
//! to optional per-index break points used when a table carries raw values but
//! no class column.

pub mod rules;

#[cfg(test)]
mod rules_tests;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::classes::{ClassScheme, HealthClass};

pub use rules::{classify, classify_code, normalize_label, Rule, RULES};

/// Invalid break-point configuration.
#[derive(Debug, Error, PartialEq)]
pub enum BreakpointError {
    #[error("index '{index}' needs {expected} thresholds for the {scheme:?} scheme, got {actual}")]
    WrongCount {
        index: String,
        scheme: ClassScheme,
        expected: usize,
        actual: usize,
    },
    #[error("thresholds for index '{0}' must be finite and strictly ascending")]
    NotAscending(String),
}

/// Ascending thresholds splitting an index range into class codes.
///
/// With thresholds `t1 < t2 < ... < tN-1`, a value below `t1` is code 1, a
/// value in `[t1, t2)` is code 2 and anything at or above `tN-1` is code N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub thresholds: Vec<f64>,
}

impl Breakpoints {
    pub fn code_for(&self, value: f64) -> i64 {
        1 + self.thresholds.iter().filter(|t| value >= **t).count() as i64
    }

    fn validate(&self, index: &str, scheme: ClassScheme) -> Result<(), BreakpointError> {
        let expected = scheme.size() - 1;
        if self.thresholds.len() != expected {
            return Err(BreakpointError::WrongCount {
                index: index.to_string(),
                scheme,
                expected,
                actual: self.thresholds.len(),
            });
        }
        let ascending = self.thresholds.iter().all(|t| t.is_finite())
            && self.thresholds.windows(2).all(|w| w[0] < w[1]);
        if !ascending {
            return Err(BreakpointError::NotAscending(index.to_string()));
        }
        Ok(())
    }
}

/// Classifier configured once per dataset.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    scheme: ClassScheme,
    breaks: HashMap<String, Breakpoints>,
}

impl Classifier {
    pub fn new(scheme: ClassScheme) -> Self {
        Self {
            scheme,
            breaks: HashMap::new(),
        }
    }

    /// Attach break points for raw-value classification of `index`.
    pub fn with_breakpoints(
        mut self,
        index: &str,
        breaks: Breakpoints,
    ) -> Result<Self, BreakpointError> {
        breaks.validate(index, self.scheme)?;
        self.breaks.insert(index.to_lowercase(), breaks);
        Ok(self)
    }

    pub fn scheme(&self) -> ClassScheme {
        self.scheme
    }

    pub fn has_breakpoints(&self, index: &str) -> bool {
        self.breaks.contains_key(&index.to_lowercase())
    }

    /// Classify a precomputed code or label.
    pub fn classify(&self, input: Option<&str>) -> HealthClass {
        classify(input, self.scheme)
    }

    /// Classify a raw index value through the configured break points.
    ///
    /// Indices without break points, and missing values, are `NoData`.
    pub fn classify_value(&self, index: &str, value: Option<f64>) -> HealthClass {
        match (self.breaks.get(&index.to_lowercase()), value) {
            (Some(breaks), Some(v)) if v.is_finite() => self.scheme.from_code(breaks.code_for(v)),
            _ => HealthClass::NoData,
        }
    }

    /// Class for one tree: the precomputed column wins when the table has one,
    /// otherwise the raw value is bucketed.
    pub fn classify_point(
        &self,
        index: &str,
        class_cell: Option<Option<&str>>,
        value: Option<f64>,
    ) -> HealthClass {
        match class_cell {
            Some(cell) => self.classify(cell),
            None => self.classify_value(index, value),
        }
    }
}

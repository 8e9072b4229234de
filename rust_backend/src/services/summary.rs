//! KPIs of one index over a (filtered) point table.

use serde::Serialize;

use crate::core::classes::{ClassScheme, HealthClass};
use crate::core::domain::{PointRecord, PointTable};

/// Descriptive statistics of a set of index values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std_dev: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Compute [`ValueStats`] for finite values.
pub fn describe(values: &[f64]) -> ValueStats {
    let count = values.len();
    if count == 0 {
        return ValueStats::default();
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = (count > 1).then(|| {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    ValueStats {
        count,
        mean: Some(mean),
        std_dev,
        median: Some(median),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}

/// Finite values of `index` over `records`.
pub fn index_values<'a, I>(records: I, index: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    records.into_iter().filter_map(|r| r.value(index)).collect()
}

/// Row count and share of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCount {
    pub class: HealthClass,
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

/// Healthy / medium / critical / no-data split of a set of classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HealthSplit {
    pub healthy: usize,
    pub medium: usize,
    pub critical: usize,
    pub no_data: usize,
}

impl HealthSplit {
    pub fn from_classes<I>(classes: I, scheme: ClassScheme) -> Self
    where
        I: IntoIterator<Item = HealthClass>,
    {
        let mut split = HealthSplit::default();
        for class in classes {
            if scheme.is_healthy(class) {
                split.healthy += 1;
            } else if scheme.is_critical(class) {
                split.critical += 1;
            } else if scheme.contains(class) {
                split.medium += 1;
            } else {
                split.no_data += 1;
            }
        }
        split
    }

    pub fn total(&self) -> usize {
        self.healthy + self.medium + self.critical + self.no_data
    }

    fn fraction(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }

    pub fn healthy_fraction(&self) -> f64 {
        self.fraction(self.healthy)
    }

    pub fn medium_fraction(&self) -> f64 {
        self.fraction(self.medium)
    }

    pub fn critical_fraction(&self) -> f64 {
        self.fraction(self.critical)
    }

    pub fn no_data_fraction(&self) -> f64 {
        self.fraction(self.no_data)
    }
}

/// Summary of one index over a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub index: String,
    pub scheme: ClassScheme,
    pub total_rows: usize,
    pub valid_count: usize,
    pub missing_count: usize,
    pub stats: ValueStats,
    /// One entry per level of the scheme plus `NoData`, in ordinal order.
    pub distribution: Vec<ClassCount>,
    pub healthy_fraction: f64,
    pub medium_fraction: f64,
    pub critical_fraction: f64,
    pub no_data_fraction: f64,
    pub mean_height_m: Option<f64>,
}

impl IndexSummary {
    pub fn count_of(&self, class: HealthClass) -> usize {
        self.distribution
            .iter()
            .find(|c| c.class == class)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn healthy_pct(&self) -> f64 {
        self.healthy_fraction * 100.0
    }

    pub fn critical_pct(&self) -> f64 {
        self.critical_fraction * 100.0
    }
}

/// Summarize `index` over every row of `table`.
///
/// A row is valid when it has a finite value; tables that only carry a class
/// column count rows with a class instead. Fractions are over all rows,
/// `NoData` included, and are 0 for an empty table.
pub fn summarize(table: &PointTable, index: &str, scheme: ClassScheme) -> IndexSummary {
    let total_rows = table.len();
    let values = index_values(&table.records, index);

    let valid_count = if table.schema.has_values(index) {
        values.len()
    } else {
        table
            .records
            .iter()
            .filter(|r| !r.class(index).is_no_data())
            .count()
    };

    let classes: Vec<HealthClass> = table.records.iter().map(|r| r.class(index)).collect();
    let split = HealthSplit::from_classes(classes.iter().copied(), scheme);

    let distribution = scheme
        .classes()
        .iter()
        .copied()
        .chain(std::iter::once(HealthClass::NoData))
        .map(|class| {
            let count = classes.iter().filter(|c| **c == class).count();
            ClassCount {
                class,
                label: class.label().to_string(),
                count,
                fraction: if total_rows == 0 {
                    0.0
                } else {
                    count as f64 / total_rows as f64
                },
            }
        })
        .collect();

    let heights: Vec<f64> = table.records.iter().filter_map(|r| r.height_m).collect();

    IndexSummary {
        index: index.to_string(),
        scheme,
        total_rows,
        valid_count,
        missing_count: total_rows - valid_count,
        stats: describe(&values),
        distribution,
        healthy_fraction: split.healthy_fraction(),
        medium_fraction: split.medium_fraction(),
        critical_fraction: split.critical_fraction(),
        no_data_fraction: split.no_data_fraction(),
        mean_height_m: describe(&heights).mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{IndexColumns, PointSchema};

    fn coded_table(codes: &[(usize, i64)], scheme: ClassScheme) -> PointTable {
        let schema = PointSchema {
            indices: vec![IndexColumns {
                name: "ndvi".to_string(),
                value_column: None,
                class_column: Some("ndvi_clase".to_string()),
            }],
            ..Default::default()
        };
        let records = codes
            .iter()
            .flat_map(|(n, code)| std::iter::repeat(*code).take(*n))
            .map(|code| {
                let mut record = PointRecord::default();
                record.classes.insert("ndvi".to_string(), scheme.from_code(code));
                record
            })
            .collect();
        PointTable::new(schema, records)
    }

    #[test]
    fn test_describe() {
        let stats = describe(&[0.2, 0.4, 0.6, 0.8]);
        assert_eq!(stats.count, 4);
        assert!((stats.mean.unwrap() - 0.5).abs() < 1e-12);
        assert!((stats.median.unwrap() - 0.5).abs() < 1e-12);
        assert!((stats.std_dev.unwrap() - 0.258198889747).abs() < 1e-9);
        assert_eq!(stats.min, Some(0.2));
        assert_eq!(stats.max, Some(0.8));

        let single = describe(&[0.3]);
        assert_eq!(single.std_dev, None);
        assert_eq!(describe(&[]), ValueStats::default());
    }

    #[test]
    fn test_seven_class_healthy_and_critical() {
        let table = coded_table(&[(60, 6), (40, 2)], ClassScheme::Seven);
        let summary = summarize(&table, "ndvi", ClassScheme::Seven);
        assert_eq!(summary.total_rows, 100);
        assert!((summary.healthy_fraction - 0.60).abs() < 1e-12);
        assert!((summary.critical_fraction - 0.40).abs() < 1e-12);
        assert_eq!(summary.count_of(HealthClass::High), 60);
    }

    #[test]
    fn test_five_class_healthy_and_critical() {
        let table = coded_table(&[(60, 5), (40, 2)], ClassScheme::Five);
        let summary = summarize(&table, "ndvi", ClassScheme::Five);
        assert!((summary.healthy_fraction - 0.60).abs() < 1e-12);
        assert!((summary.critical_fraction - 0.40).abs() < 1e-12);
        assert_eq!(summary.valid_count, 100);
    }

    #[test]
    fn test_fractions_include_no_data() {
        let table = coded_table(&[(2, 5), (1, 3), (1, 0)], ClassScheme::Five);
        let summary = summarize(&table, "ndvi", ClassScheme::Five);
        assert!((summary.healthy_fraction - 0.5).abs() < 1e-12);
        assert!((summary.medium_fraction - 0.25).abs() < 1e-12);
        assert!((summary.no_data_fraction - 0.25).abs() < 1e-12);
        assert_eq!(summary.missing_count, 1);
        assert_eq!(summary.distribution.len(), 6);
    }

    #[test]
    fn test_empty_table() {
        let summary = summarize(&PointTable::default(), "ndvi", ClassScheme::Five);
        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.healthy_fraction, 0.0);
        assert_eq!(summary.stats.mean, None);
    }
}

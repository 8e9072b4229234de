//! Two-flight comparison of one index.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::classes::ClassScheme;
use crate::core::domain::PointTable;
use crate::parsing::dates::canonical_date;
use crate::services::breakdown::{group_rows, percent_change, GroupKey};
use crate::services::summary::{describe, index_values, summarize, IndexSummary};

/// Direction of the mean change between two flights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    SignificantImprovement,
    SlightImprovement,
    Stable,
    SlightDecline,
    SignificantDecline,
}

impl Trend {
    /// Band for a percent change of the mean.
    pub fn from_delta_pct(delta_pct: f64) -> Self {
        if delta_pct > 5.0 {
            Trend::SignificantImprovement
        } else if delta_pct > 1.0 {
            Trend::SlightImprovement
        } else if delta_pct >= -1.0 {
            Trend::Stable
        } else if delta_pct >= -5.0 {
            Trend::SlightDecline
        } else {
            Trend::SignificantDecline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::SignificantImprovement => "Significant improvement",
            Trend::SlightImprovement => "Slight improvement",
            Trend::Stable => "Stable",
            Trend::SlightDecline => "Slight decline",
            Trend::SignificantDecline => "Significant decline",
        }
    }
}

/// Mean change of one block between the two flights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockChange {
    pub block: String,
    pub mean_before: Option<f64>,
    pub mean_after: Option<f64>,
    pub delta: Option<f64>,
    pub delta_pct: Option<f64>,
}

/// Share of one class in each flight, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassShare {
    pub label: String,
    pub pct_before: f64,
    pub pct_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightComparison {
    pub index: String,
    pub date_before: String,
    pub date_after: String,
    pub before: IndexSummary,
    pub after: IndexSummary,
    pub delta: Option<f64>,
    /// `None` when the first mean is zero or missing.
    pub delta_pct: Option<f64>,
    /// Healthy percent after minus healthy percent before.
    pub healthy_pct_change: f64,
    pub trend: Trend,
    pub blocks: Vec<BlockChange>,
    pub class_shares: Vec<ClassShare>,
}

fn block_means(table: &PointTable, index: &str) -> Vec<(String, Option<f64>)> {
    group_rows(table, GroupKey::Block)
        .into_iter()
        .map(|(block, rows)| {
            let mean = describe(&index_values(rows.iter().copied(), index)).mean;
            (block, mean)
        })
        .collect()
}

fn block_changes(before: &PointTable, after: &PointTable, index: &str) -> Vec<BlockChange> {
    let before_means = block_means(before, index);
    let after_means = block_means(after, index);
    let lookup = |means: &[(String, Option<f64>)], block: &str| {
        means.iter().find(|(b, _)| b == block).and_then(|(_, m)| *m)
    };

    let blocks: BTreeSet<&String> = before_means
        .iter()
        .chain(after_means.iter())
        .map(|(b, _)| b)
        .collect();

    blocks
        .into_iter()
        .map(|block| {
            let mean_before = lookup(&before_means, block.as_str());
            let mean_after = lookup(&after_means, block.as_str());
            let delta = mean_after.zip(mean_before).map(|(a, b)| a - b);
            BlockChange {
                block: block.clone(),
                mean_before,
                mean_after,
                delta,
                delta_pct: percent_change(delta, mean_before),
            }
        })
        .collect()
}

/// Compare `index` between two flights of `table`.
///
/// Dates are canonicalised before matching. A zero or missing first mean
/// leaves `delta_pct` undefined and the trend reads as stable.
pub fn compare_flights(
    table: &PointTable,
    index: &str,
    date_before: &str,
    date_after: &str,
    scheme: ClassScheme,
) -> FlightComparison {
    let date_before = canonical_date(date_before).unwrap_or_default();
    let date_after = canonical_date(date_after).unwrap_or_default();
    let first = table.retain_copy(|r| r.flight_date.as_deref() == Some(date_before.as_str()));
    let second = table.retain_copy(|r| r.flight_date.as_deref() == Some(date_after.as_str()));

    let before = summarize(&first, index, scheme);
    let after = summarize(&second, index, scheme);

    let delta = after.stats.mean.zip(before.stats.mean).map(|(a, b)| a - b);
    let delta_pct = percent_change(delta, before.stats.mean);
    let trend = Trend::from_delta_pct(delta_pct.unwrap_or(0.0));

    let class_shares = before
        .distribution
        .iter()
        .zip(after.distribution.iter())
        .map(|(b, a)| ClassShare {
            label: b.label.clone(),
            pct_before: b.fraction * 100.0,
            pct_after: a.fraction * 100.0,
        })
        .collect();

    log::debug!(
        "Compared {} between {} and {}: {:?}",
        index,
        date_before,
        date_after,
        trend
    );

    FlightComparison {
        index: index.to_string(),
        healthy_pct_change: after.healthy_pct() - before.healthy_pct(),
        blocks: block_changes(&first, &second, index),
        date_before,
        date_after,
        before,
        after,
        delta,
        delta_pct,
        trend,
        class_shares,
    }
}

/// Compare the first two flights of the table, if it has at least two.
pub fn compare_first_flights(
    table: &PointTable,
    index: &str,
    scheme: ClassScheme,
) -> Option<FlightComparison> {
    match table.flight_dates().as_slice() {
        [first, second, ..] => Some(compare_flights(table, index, first, second, scheme)),
        _ => None,
    }
}

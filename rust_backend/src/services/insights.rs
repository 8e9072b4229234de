//! Automatic reading of an index summary: overall status, weak blocks and
//! field recommendations.

use serde::Serialize;

use crate::core::catalog::{display_name, index_info, IndexCategory};
use crate::core::classes::{ClassScheme, HealthClass};
use crate::core::domain::PointTable;
use crate::services::breakdown::{breakdown, GroupKey};
use crate::services::summary::{summarize, IndexSummary};

/// How many weak blocks are reported.
const MAX_UNDERPERFORMING: usize = 5;

/// Overall status graded on the healthy percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Moderate,
    Low,
    Critical,
}

impl HealthStatus {
    pub fn from_healthy_pct(pct: f64) -> Self {
        if pct >= 80.0 {
            HealthStatus::Excellent
        } else if pct >= 60.0 {
            HealthStatus::Good
        } else if pct >= 40.0 {
            HealthStatus::Moderate
        } else if pct >= 20.0 {
            HealthStatus::Low
        } else {
            HealthStatus::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Moderate => "Moderate",
            HealthStatus::Low => "Low",
            HealthStatus::Critical => "Critical",
        }
    }
}

/// A block whose mean falls more than one standard deviation below the
/// overall mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderperformingBlock {
    pub block: String,
    pub mean: f64,
    pub rows: usize,
    pub diff_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub index: String,
    pub index_name: String,
    pub status: HealthStatus,
    pub summary: IndexSummary,
    pub very_low_count: usize,
    /// Lowest mean first.
    pub underperforming: Vec<UnderperformingBlock>,
    pub recommendations: Vec<String>,
}

fn underperforming_blocks(
    table: &PointTable,
    index: &str,
    summary: &IndexSummary,
    scheme: ClassScheme,
) -> Vec<UnderperformingBlock> {
    let (Some(mean), Some(std_dev)) = (summary.stats.mean, summary.stats.std_dev) else {
        return Vec::new();
    };
    let threshold = mean - std_dev;

    let mut weak: Vec<UnderperformingBlock> = breakdown(table, index, GroupKey::Block, scheme)
        .groups
        .into_iter()
        .filter_map(|group| {
            let block_mean = group.stats.mean?;
            (block_mean < threshold).then(|| UnderperformingBlock {
                block: group.key,
                mean: block_mean,
                rows: group.stats.count,
                diff_pct: group.deviation_pct,
            })
        })
        .collect();

    weak.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    weak.truncate(MAX_UNDERPERFORMING);
    weak
}

fn recommendations(index: &str, summary: &IndexSummary, very_low_count: usize) -> Vec<String> {
    let category = index_info(index).map(|info| info.category);
    let critical_pct = summary.critical_pct();
    let mut advice = Vec::new();

    match category {
        Some(IndexCategory::Chlorophyll) => {
            if critical_pct > 10.0 {
                advice.push("Review the nitrogen fertilization program in affected areas".to_string());
                advice.push("Run a foliar analysis to confirm nutrient deficiencies".to_string());
            }
            if very_low_count > 0 {
                advice.push("Apply foliar fertilizer urgently on critical trees".to_string());
            }
        }
        Some(IndexCategory::Vigor) => {
            if critical_pct > 10.0 {
                advice.push("Check the irrigation system in low-vigor zones".to_string());
                advice.push("Inspect for pests or diseases".to_string());
            }
            if very_low_count > 0 {
                advice.push("Schedule an urgent field inspection of very low vigor trees".to_string());
            }
        }
        Some(IndexCategory::CanopyStructure) | None => {}
    }

    if summary.healthy_pct() < 60.0 {
        advice.push("Plan a follow-up flight in 2-3 weeks to track the evolution".to_string());
    }

    advice
}

/// Build the automatic analysis of `index` over `table`.
pub fn build_insights(table: &PointTable, index: &str, scheme: ClassScheme) -> Insights {
    let summary = summarize(table, index, scheme);
    let very_low_count = summary.count_of(HealthClass::VeryLow);

    Insights {
        index: index.to_string(),
        index_name: display_name(index),
        status: HealthStatus::from_healthy_pct(summary.healthy_pct()),
        underperforming: underperforming_blocks(table, index, &summary, scheme),
        recommendations: recommendations(index, &summary, very_low_count),
        very_low_count,
        summary,
    }
}

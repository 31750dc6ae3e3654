//! Composite RFM scoring and segment classification

use std::fmt;

use crate::binning::quantile_groups;
use crate::data::TransactionRecord;
use crate::metrics::{CustomerMetrics, MetricRecord};
use crate::score::{score_metrics, RfmScores};

/// Number of value-segment tiers.
pub const VALUE_SEGMENT_TIERS: usize = 3;

/// Three-tier value segment from equal-frequency splitting of the
/// composite RFM score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSegment {
    LowValue,
    MidValue,
    HighValue,
}

impl ValueSegment {
    /// All tiers in ascending order.
    pub const ALL: [ValueSegment; VALUE_SEGMENT_TIERS] = [
        ValueSegment::LowValue,
        ValueSegment::MidValue,
        ValueSegment::HighValue,
    ];

    fn from_tier(tier: usize) -> Self {
        match tier {
            0 => ValueSegment::LowValue,
            1 => ValueSegment::MidValue,
            _ => ValueSegment::HighValue,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueSegment::LowValue => "Low-Value",
            ValueSegment::MidValue => "Mid-Value",
            ValueSegment::HighValue => "High-Value",
        }
    }
}

impl fmt::Display for ValueSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named behavior segment from fixed thresholds on the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerSegment {
    Champions,
    PotentialLoyalists,
    AtRiskCustomers,
    CanLose,
    Lost,
    /// Composite score below every threshold. Impossible for scores in
    /// 3..=15, but defined; renders as an empty label.
    Unclassified,
}

impl CustomerSegment {
    /// The named segments, highest threshold first.
    pub const NAMED: [CustomerSegment; 5] = [
        CustomerSegment::Champions,
        CustomerSegment::PotentialLoyalists,
        CustomerSegment::AtRiskCustomers,
        CustomerSegment::CanLose,
        CustomerSegment::Lost,
    ];

    /// First matching threshold rule wins. Champions is open-ended above.
    pub fn from_rfm_score(rfm_score: u8) -> Self {
        match rfm_score {
            s if s >= 9 => CustomerSegment::Champions,
            s if s >= 6 => CustomerSegment::PotentialLoyalists,
            s if s >= 5 => CustomerSegment::AtRiskCustomers,
            s if s >= 4 => CustomerSegment::CanLose,
            s if s >= 3 => CustomerSegment::Lost,
            _ => CustomerSegment::Unclassified,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerSegment::Champions => "Champions",
            CustomerSegment::PotentialLoyalists => "Potential Loyalists",
            CustomerSegment::AtRiskCustomers => "At Risk Customers",
            CustomerSegment::CanLose => "Can Lose",
            CustomerSegment::Lost => "Lost",
            CustomerSegment::Unclassified => "",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully classified transaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: TransactionRecord,
    pub metrics: CustomerMetrics,
    pub scores: RfmScores,
    pub rfm_score: u8,
    pub value_segment: ValueSegment,
    pub customer_segment: CustomerSegment,
}

/// Score and classify every row.
///
/// Sub-scores come from equal-width binning, the value segment from
/// rank-based equal-frequency splitting of the composite score across all
/// rows, and the customer segment from the fixed thresholds. Output
/// preserves input row order.
pub fn classify_records(rows: Vec<MetricRecord>) -> Vec<ScoredRecord> {
    let scores = score_metrics(&rows);
    let composites: Vec<f64> = scores.iter().map(|s| f64::from(s.composite())).collect();
    let tiers = quantile_groups(&composites, VALUE_SEGMENT_TIERS);

    rows.into_iter()
        .zip(scores)
        .zip(tiers)
        .map(|((row, scores), tier)| {
            let rfm_score = scores.composite();
            ScoredRecord {
                rfm_score,
                value_segment: ValueSegment::from_tier(tier),
                customer_segment: CustomerSegment::from_rfm_score(rfm_score),
                scores,
                metrics: row.metrics,
                record: row.record,
            }
        })
        .collect()
}

//! Ordinal RFM scoring via equal-width binning

use crate::binning::equal_width_bins;
use crate::metrics::MetricRecord;

/// Number of equal-width bins (and therefore score levels) per metric.
pub const SCORE_BINS: usize = 5;

// Ascending bin index maps to these labels. Recency is inverted so that
// fresher purchases score higher.
const RECENCY_LABELS: [u8; SCORE_BINS] = [5, 4, 3, 2, 1];
const FREQUENCY_LABELS: [u8; SCORE_BINS] = [1, 2, 3, 4, 5];
const MONETARY_LABELS: [u8; SCORE_BINS] = [1, 2, 3, 4, 5];

/// Ordinal scores for one row, each in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfmScores {
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
}

impl RfmScores {
    /// Composite RFM score, in 3..=15.
    pub fn composite(&self) -> u8 {
        self.recency + self.frequency + self.monetary
    }
}

/// Score every row's metrics into the 1-5 ordinal range.
///
/// Each metric is binned over its observed range across all rows; a metric
/// that is constant across the dataset yields the same score on every row.
pub fn score_metrics(rows: &[MetricRecord]) -> Vec<RfmScores> {
    let recency: Vec<f64> = rows.iter().map(|r| r.metrics.recency_days as f64).collect();
    let frequency: Vec<f64> = rows.iter().map(|r| f64::from(r.metrics.frequency)).collect();
    let monetary: Vec<f64> = rows.iter().map(|r| r.metrics.monetary_value).collect();

    let recency_bins = equal_width_bins(&recency, SCORE_BINS);
    let frequency_bins = equal_width_bins(&frequency, SCORE_BINS);
    let monetary_bins = equal_width_bins(&monetary, SCORE_BINS);

    (0..rows.len())
        .map(|i| RfmScores {
            recency: RECENCY_LABELS[recency_bins[i]],
            frequency: FREQUENCY_LABELS[frequency_bins[i]],
            monetary: MONETARY_LABELS[monetary_bins[i]],
        })
        .collect()
}

//! Segment distribution summaries and classified-table export

use std::collections::HashMap;
use std::fs::File;

use polars::prelude::*;

use crate::data::{
    CUSTOMER_ID_COLUMN, ORDER_ID_COLUMN, PURCHASE_DATE_COLUMN, TRANSACTION_AMOUNT_COLUMN,
};
use crate::segment::{CustomerSegment, ScoredRecord, ValueSegment};

/// Mean sub-scores across the rows of one customer segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentScoreMeans {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

/// Aggregated distribution of a classified table.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmReport {
    pub total_rows: usize,
    /// Row count per value segment, ascending tiers.
    pub value_segment_counts: Vec<(ValueSegment, usize)>,
    /// Row count per named customer segment, highest threshold first.
    pub customer_segment_counts: Vec<(CustomerSegment, usize)>,
    /// Rows that matched no threshold.
    pub unclassified_count: usize,
    /// Row counts per (value segment, customer segment) pair that occurs.
    pub cross_counts: Vec<(ValueSegment, CustomerSegment, usize)>,
    /// Mean sub-scores per customer segment, for segments with rows.
    pub mean_scores: Vec<(CustomerSegment, SegmentScoreMeans)>,
}

/// Aggregate counts and score averages per segment. Pure; iteration
/// orders are fixed so the report is deterministic.
pub fn summarize(rows: &[ScoredRecord]) -> RfmReport {
    let mut by_value: HashMap<ValueSegment, usize> = HashMap::new();
    let mut by_customer: HashMap<CustomerSegment, usize> = HashMap::new();
    let mut by_pair: HashMap<(ValueSegment, CustomerSegment), usize> = HashMap::new();
    let mut score_sums: HashMap<CustomerSegment, (f64, f64, f64)> = HashMap::new();

    for row in rows {
        *by_value.entry(row.value_segment).or_insert(0) += 1;
        *by_customer.entry(row.customer_segment).or_insert(0) += 1;
        *by_pair
            .entry((row.value_segment, row.customer_segment))
            .or_insert(0) += 1;
        let sums = score_sums
            .entry(row.customer_segment)
            .or_insert((0.0, 0.0, 0.0));
        sums.0 += f64::from(row.scores.recency);
        sums.1 += f64::from(row.scores.frequency);
        sums.2 += f64::from(row.scores.monetary);
    }

    let value_segment_counts = ValueSegment::ALL
        .iter()
        .map(|&segment| (segment, by_value.get(&segment).copied().unwrap_or(0)))
        .collect();

    let customer_segment_counts = CustomerSegment::NAMED
        .iter()
        .map(|&segment| (segment, by_customer.get(&segment).copied().unwrap_or(0)))
        .collect();

    let unclassified_count = by_customer
        .get(&CustomerSegment::Unclassified)
        .copied()
        .unwrap_or(0);

    let mut cross_counts = Vec::new();
    for &value in &ValueSegment::ALL {
        for &customer in CustomerSegment::NAMED
            .iter()
            .chain([CustomerSegment::Unclassified].iter())
        {
            if let Some(&count) = by_pair.get(&(value, customer)) {
                cross_counts.push((value, customer, count));
            }
        }
    }

    let mut mean_scores = Vec::new();
    for &segment in CustomerSegment::NAMED
        .iter()
        .chain([CustomerSegment::Unclassified].iter())
    {
        if let (Some(&count), Some(&(r, f, m))) =
            (by_customer.get(&segment), score_sums.get(&segment))
        {
            let n = count as f64;
            mean_scores.push((
                segment,
                SegmentScoreMeans {
                    recency: r / n,
                    frequency: f / n,
                    monetary: m / n,
                },
            ));
        }
    }

    RfmReport {
        total_rows: rows.len(),
        value_segment_counts,
        customer_segment_counts,
        unclassified_count,
        cross_counts,
        mean_scores,
    }
}

fn segment_display(segment: CustomerSegment) -> &'static str {
    match segment {
        CustomerSegment::Unclassified => "(unclassified)",
        named => named.label(),
    }
}

/// Print the segment summary to the console.
pub fn print_report(report: &RfmReport) {
    println!("\n=== RFM Segment Summary ===");
    println!("Total rows: {}", report.total_rows);

    println!("\nValue segment distribution:");
    println!("  Segment    | Rows  | Share");
    println!("  -----------|-------|------");
    for (segment, count) in &report.value_segment_counts {
        println!(
            "  {:<10} | {:>5} | {:>4.1}%",
            segment.label(),
            count,
            percentage(*count, report.total_rows)
        );
    }

    println!("\nCustomer segment distribution:");
    println!("  Segment             | Rows  | Share");
    println!("  --------------------|-------|------");
    for (segment, count) in &report.customer_segment_counts {
        println!(
            "  {:<19} | {:>5} | {:>4.1}%",
            segment.label(),
            count,
            percentage(*count, report.total_rows)
        );
    }
    if report.unclassified_count > 0 {
        println!(
            "  {:<19} | {:>5} | {:>4.1}%",
            "(unclassified)",
            report.unclassified_count,
            percentage(report.unclassified_count, report.total_rows)
        );
    }

    println!("\nCustomer segments by value tier:");
    for (value, customer, count) in &report.cross_counts {
        println!(
            "  {:<10} / {:<19} : {}",
            value.label(),
            segment_display(*customer),
            count
        );
    }

    println!("\nAverage scores per customer segment:");
    println!("  Segment             | Recency | Frequency | Monetary");
    println!("  --------------------|---------|-----------|---------");
    for (segment, means) in &report.mean_scores {
        println!(
            "  {:<19} | {:>7.2} | {:>9.2} | {:>8.2}",
            segment_display(*segment),
            means.recency,
            means.frequency,
            means.monetary
        );
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Materialize the classified table as a DataFrame with the original
/// columns plus the derived metric, score, and segment columns.
pub fn classified_dataframe(rows: &[ScoredRecord]) -> crate::Result<DataFrame> {
    let customer_ids: Vec<&str> = rows.iter().map(|r| r.record.customer_id.as_str()).collect();
    let purchase_dates: Vec<String> = rows
        .iter()
        .map(|r| r.record.purchase_date.format("%Y-%m-%d").to_string())
        .collect();
    let order_ids: Vec<&str> = rows.iter().map(|r| r.record.order_id.as_str()).collect();
    let amounts: Vec<f64> = rows.iter().map(|r| r.record.transaction_amount).collect();
    let recency: Vec<i64> = rows.iter().map(|r| r.metrics.recency_days).collect();
    let frequency: Vec<u32> = rows.iter().map(|r| r.metrics.frequency).collect();
    let monetary: Vec<f64> = rows.iter().map(|r| r.metrics.monetary_value).collect();
    let recency_scores: Vec<u32> = rows.iter().map(|r| u32::from(r.scores.recency)).collect();
    let frequency_scores: Vec<u32> = rows.iter().map(|r| u32::from(r.scores.frequency)).collect();
    let monetary_scores: Vec<u32> = rows.iter().map(|r| u32::from(r.scores.monetary)).collect();
    let rfm_scores: Vec<u32> = rows.iter().map(|r| u32::from(r.rfm_score)).collect();
    let value_segments: Vec<&str> = rows.iter().map(|r| r.value_segment.label()).collect();
    let customer_segments: Vec<&str> = rows.iter().map(|r| r.customer_segment.label()).collect();

    let df = DataFrame::new(vec![
        Series::new(CUSTOMER_ID_COLUMN, customer_ids),
        Series::new(PURCHASE_DATE_COLUMN, purchase_dates),
        Series::new(ORDER_ID_COLUMN, order_ids),
        Series::new(TRANSACTION_AMOUNT_COLUMN, amounts),
        Series::new("Recency", recency),
        Series::new("Frequency", frequency),
        Series::new("MonetaryValue", monetary),
        Series::new("RecencyScore", recency_scores),
        Series::new("FrequencyScore", frequency_scores),
        Series::new("MonetaryScore", monetary_scores),
        Series::new("RFM_Score", rfm_scores),
        Series::new("Value Segment", value_segments),
        Series::new("RFM Customer Segments", customer_segments),
    ])?;
    Ok(df)
}

/// Export the classified table as CSV. The library core never writes
/// files; this is the collaborator surface used by the binary.
pub fn write_classified_csv(rows: &[ScoredRecord], file_path: &str) -> crate::Result<()> {
    let mut df = classified_dataframe(rows)?;
    let mut file = File::create(file_path)?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransactionRecord;
    use crate::metrics::derive_metrics;
    use crate::segment::classify_records;
    use chrono::NaiveDate;

    fn classified_fixture() -> Vec<ScoredRecord> {
        let records: Vec<TransactionRecord> = (0..12)
            .map(|i| TransactionRecord {
                customer_id: format!("{}", 1000 + i),
                order_id: format!("{}", 500000 + i),
                purchase_date: NaiveDate::from_ymd_opt(2023, 4, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64 * 2))
                    .unwrap(),
                transaction_amount: 50.0 + (i as f64) * 75.0,
            })
            .collect();
        let reference = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        classify_records(derive_metrics(records, reference))
    }

    #[test]
    fn test_summarize_counts_match_table() {
        let rows = classified_fixture();
        let report = summarize(&rows);

        assert_eq!(report.total_rows, rows.len());

        let value_total: usize = report.value_segment_counts.iter().map(|(_, c)| c).sum();
        assert_eq!(value_total, rows.len());

        let customer_total: usize = report
            .customer_segment_counts
            .iter()
            .map(|(_, c)| c)
            .sum::<usize>()
            + report.unclassified_count;
        assert_eq!(customer_total, rows.len());

        let cross_total: usize = report.cross_counts.iter().map(|(_, _, c)| c).sum();
        assert_eq!(cross_total, rows.len());
    }

    #[test]
    fn test_summarize_lists_every_tier_and_named_segment() {
        let rows = classified_fixture();
        let report = summarize(&rows);

        let tiers: Vec<ValueSegment> = report
            .value_segment_counts
            .iter()
            .map(|(s, _)| *s)
            .collect();
        assert_eq!(tiers, ValueSegment::ALL.to_vec());

        let segments: Vec<CustomerSegment> = report
            .customer_segment_counts
            .iter()
            .map(|(s, _)| *s)
            .collect();
        assert_eq!(segments, CustomerSegment::NAMED.to_vec());
    }

    #[test]
    fn test_mean_scores_stay_in_score_range() {
        let rows = classified_fixture();
        let report = summarize(&rows);

        assert!(!report.mean_scores.is_empty());
        for (_, means) in &report.mean_scores {
            assert!((1.0..=5.0).contains(&means.recency));
            assert!((1.0..=5.0).contains(&means.frequency));
            assert!((1.0..=5.0).contains(&means.monetary));
        }
    }

    #[test]
    fn test_summarize_empty_table() {
        let report = summarize(&[]);
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.unclassified_count, 0);
        assert!(report.cross_counts.is_empty());
        assert!(report.mean_scores.is_empty());
        // Tiers and named segments are still listed, at zero.
        assert!(report.value_segment_counts.iter().all(|(_, c)| *c == 0));
        assert!(report.customer_segment_counts.iter().all(|(_, c)| *c == 0));
    }

    #[test]
    fn test_classified_dataframe_columns() {
        let rows = classified_fixture();
        let df = classified_dataframe(&rows).unwrap();

        assert_eq!(df.height(), rows.len());
        let names = df.get_column_names();
        for expected in [
            CUSTOMER_ID_COLUMN,
            PURCHASE_DATE_COLUMN,
            ORDER_ID_COLUMN,
            TRANSACTION_AMOUNT_COLUMN,
            "Recency",
            "Frequency",
            "MonetaryValue",
            "RecencyScore",
            "FrequencyScore",
            "MonetaryScore",
            "RFM_Score",
            "Value Segment",
            "RFM Customer Segments",
        ] {
            assert!(names.contains(&expected), "missing column {expected}");
        }
    }

    #[test]
    fn test_write_classified_csv() {
        let rows = classified_fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classified.csv");
        let path = path.to_str().unwrap();

        write_classified_csv(&rows, path).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.contains("RFM_Score"));
        assert!(header.contains("Value Segment"));
        assert_eq!(written.lines().count(), rows.len() + 1);
    }
}

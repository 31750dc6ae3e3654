//! Per-customer RFM metric derivation

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::data::TransactionRecord;

/// Recency, Frequency, and Monetary values carried on a single row.
///
/// Frequency and monetary value are shared by every row of a customer.
/// Recency is computed against the row's own purchase date, so a customer
/// with several transactions carries a different recency on each row.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    /// Whole days between the reference date and this row's purchase date.
    /// Negative for future-dated purchases; not clamped.
    pub recency_days: i64,
    /// Count of distinct order ids for the customer. At least 1.
    pub frequency: u32,
    /// Sum of transaction amounts across the customer's rows.
    pub monetary_value: f64,
}

/// A transaction row joined with its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub record: TransactionRecord,
    pub metrics: CustomerMetrics,
}

/// Join derived RFM metrics onto every transaction row.
///
/// Pure transformation; the output preserves the input row order. The
/// reference date is injected by the caller so runs are deterministic.
pub fn derive_metrics(
    records: Vec<TransactionRecord>,
    reference_date: NaiveDate,
) -> Vec<MetricRecord> {
    let mut distinct_orders: HashMap<String, HashSet<String>> = HashMap::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for record in &records {
        distinct_orders
            .entry(record.customer_id.clone())
            .or_default()
            .insert(record.order_id.clone());
        *totals.entry(record.customer_id.clone()).or_insert(0.0) += record.transaction_amount;
    }

    records
        .into_iter()
        .map(|record| {
            let recency_days = reference_date
                .signed_duration_since(record.purchase_date)
                .num_days();
            let frequency = distinct_orders[record.customer_id.as_str()].len() as u32;
            let monetary_value = totals[record.customer_id.as_str()];
            MetricRecord {
                metrics: CustomerMetrics {
                    recency_days,
                    frequency,
                    monetary_value,
                },
                record,
            }
        })
        .collect()
}

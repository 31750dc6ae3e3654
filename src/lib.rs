//! RfmForge: customer segmentation from transaction logs using RFM scoring
//!
//! This library derives Recency, Frequency, and Monetary metrics from a
//! transaction table, bins them into ordinal scores, and classifies every
//! row into value and behavior segments for marketing analysis.

pub mod binning;
pub mod cli;
pub mod data;
pub mod metrics;
pub mod report;
pub mod score;
pub mod segment;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_transactions, MalformedInputError, TransactionRecord};
pub use metrics::{derive_metrics, CustomerMetrics, MetricRecord};
pub use report::{summarize, RfmReport};
pub use segment::{classify_records, CustomerSegment, ScoredRecord, ValueSegment};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

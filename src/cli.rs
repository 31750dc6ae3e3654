//! Command-line interface definitions and argument parsing

use chrono::NaiveDate;
use clap::Parser;

/// Customer segmentation CLI using RFM scoring on transaction data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "rfm_data.csv")]
    pub input: String,

    /// Reference date for recency calculation as YYYY-MM-DD
    /// (defaults to the current UTC date)
    #[arg(short, long)]
    pub reference_date: Option<String>,

    /// Optional output path for the classified table as CSV
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the reference date argument, if given.
    /// Expected format: "YYYY-MM-DD"
    pub fn parse_reference_date(&self) -> crate::Result<Option<NaiveDate>> {
        if let Some(ref raw) = self.reference_date {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid reference date '{}', expected YYYY-MM-DD", raw))?;
            Ok(Some(date))
        } else {
            Ok(None)
        }
    }
}

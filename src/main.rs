//! RfmForge: Customer Segmentation CLI using RFM scoring
//!
//! This is the main entrypoint that orchestrates data loading, metric
//! derivation, scoring, classification, and summary reporting.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use rfmforge::{classify_records, derive_metrics, load_transactions, report, Args};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("RfmForge - Customer Segmentation using RFM Scoring");
        println!("==================================================\n");
    }

    // The library always takes the reference date as a parameter; the
    // system clock is consulted only here, at the binary boundary.
    let reference_date = match args.parse_reference_date()? {
        Some(date) => date,
        None => Utc::now().date_naive(),
    };

    run_pipeline(&args, reference_date)
}

/// Run the full segmentation pipeline
fn run_pipeline(args: &Args, reference_date: NaiveDate) -> Result<()> {
    println!("=== RFM Segmentation Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
    }

    let load_start = Instant::now();
    let records = load_transactions(&args.input)?;

    println!("✓ Transactions loaded: {} rows", records.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", load_start.elapsed().as_secs_f64());
    }

    // Step 2: Derive RFM metrics
    if args.verbose {
        println!("\nStep 2: Deriving RFM metrics");
        println!("  Reference date: {}", reference_date);
    }

    let rows = derive_metrics(records, reference_date);
    let customer_count = rows
        .iter()
        .map(|row| row.record.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    println!("✓ Metrics derived: {} customers", customer_count);

    // Step 3: Score and classify
    if args.verbose {
        println!("\nStep 3: Scoring and classifying rows");
    }

    let classified = classify_records(rows);
    println!("✓ Rows scored and classified");

    // Step 4: Summarize segment distributions
    let summary = report::summarize(&classified);
    report::print_report(&summary);

    // Step 5: Optional export of the classified table
    if let Some(ref output) = args.output {
        report::write_classified_csv(&classified, output)?;
        println!("\nClassified table saved to: {}", output);
    }

    println!("\n=== Pipeline Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

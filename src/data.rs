//! Transaction table loading using Polars

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

/// Required input column: customer identifier.
pub const CUSTOMER_ID_COLUMN: &str = "CustomerID";
/// Required input column: purchase date.
pub const PURCHASE_DATE_COLUMN: &str = "PurchaseDate";
/// Required input column: order identifier.
pub const ORDER_ID_COLUMN: &str = "OrderID";
/// Required input column: transaction amount.
pub const TRANSACTION_AMOUNT_COLUMN: &str = "TransactionAmount";

/// The input table is missing a required column or holds a value that does
/// not parse as its expected type. Aborts the run; there are no partial
/// results.
#[derive(Debug, Error)]
pub enum MalformedInputError {
    #[error("required column '{0}' is missing from the input")]
    MissingColumn(String),
    #[error("column '{column}' has an empty value at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("column '{column}' has an unparsable value '{value}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

/// One raw row of the transaction log. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub order_id: String,
    pub purchase_date: NaiveDate,
    pub transaction_amount: f64,
}

/// Load a delimited transaction file into typed records, in file order.
///
/// The file must carry a header row with at least the four required
/// columns; auxiliary columns (product info, location, ...) are ignored.
/// Duplicate rows and negative amounts pass through unvalidated.
pub fn load_transactions(file_path: &str) -> crate::Result<Vec<TransactionRecord>> {
    let df = CsvReader::from_path(file_path)?.has_header(true).finish()?;
    records_from_dataframe(&df)
}

/// Build typed records from an already-loaded transaction table.
pub fn records_from_dataframe(df: &DataFrame) -> crate::Result<Vec<TransactionRecord>> {
    let customer_ids = text_column(df, CUSTOMER_ID_COLUMN)?;
    let order_ids = text_column(df, ORDER_ID_COLUMN)?;
    let raw_dates = text_column(df, PURCHASE_DATE_COLUMN)?;
    let amounts = amount_column(df, TRANSACTION_AMOUNT_COLUMN)?;

    let mut records = Vec::with_capacity(customer_ids.len());
    let rows = customer_ids
        .into_iter()
        .zip(order_ids)
        .zip(raw_dates.into_iter().zip(amounts));
    for (row, ((customer_id, order_id), (raw_date, transaction_amount))) in rows.enumerate() {
        let purchase_date = parse_purchase_date(&raw_date).ok_or_else(|| {
            MalformedInputError::InvalidValue {
                column: PURCHASE_DATE_COLUMN.to_string(),
                row,
                value: raw_date.clone(),
            }
        })?;
        records.push(TransactionRecord {
            customer_id,
            order_id,
            purchase_date,
            transaction_amount,
        });
    }
    Ok(records)
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, MalformedInputError> {
    df.column(name)
        .map_err(|_| MalformedInputError::MissingColumn(name.to_string()))
}

/// Read an identifier column as text. Numeric identifiers are cast to
/// their text form.
fn text_column(df: &DataFrame, name: &str) -> crate::Result<Vec<String>> {
    let series = required_column(df, name)?.cast(&DataType::Utf8)?;
    let mut values = Vec::with_capacity(series.len());
    for (row, value) in series.utf8()?.into_iter().enumerate() {
        match value {
            Some(text) => values.push(text.to_string()),
            None => {
                return Err(MalformedInputError::MissingValue {
                    column: name.to_string(),
                    row,
                }
                .into())
            }
        }
    }
    Ok(values)
}

/// Read a numeric column as `f64`. A cell that cannot be read as a number
/// surfaces as `MalformedInputError` with the offending text.
fn amount_column(df: &DataFrame, name: &str) -> crate::Result<Vec<f64>> {
    let series = required_column(df, name)?;
    let floats = series.cast(&DataType::Float64)?;
    let originals = series.cast(&DataType::Utf8)?;
    let originals = originals.utf8()?;

    let mut values = Vec::with_capacity(floats.len());
    for (row, value) in floats.f64()?.into_iter().enumerate() {
        match value {
            Some(amount) => values.push(amount),
            None => {
                let err = match originals.get(row) {
                    Some(raw) => MalformedInputError::InvalidValue {
                        column: name.to_string(),
                        row,
                        value: raw.to_string(),
                    },
                    None => MalformedInputError::MissingValue {
                        column: name.to_string(),
                        row,
                    },
                };
                return Err(err.into());
            }
        }
    }
    Ok(values)
}

/// Accepts `YYYY-MM-DD` and common datetime forms; the time part is
/// discarded.
fn parse_purchase_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

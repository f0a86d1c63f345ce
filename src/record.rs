use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use std::path::Path;

use crate::usd::Usd;

/// Defines the CSV format for sales transaction data.
///
/// Expected header: `Date,Product,Salesperson,Amount,Customer`, with `Date`
/// as `YYYY-MM-DD` and `Amount` as a decimal with up to 2 fraction digits.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Salesperson")]
    pub salesperson: String,
    #[serde(rename = "Amount")]
    pub amount: Usd,
    #[serde(rename = "Customer")]
    pub customer: String,
}

/// Reads sales transactions from the CSV file at `path`.
///
/// The input file is a required precondition of the whole pipeline, so a
/// missing file is reported immediately with the offending path, before any
/// output is produced.
///
/// Rows with an unparseable date or amount abort the load with the file
/// path attached as context. Partial data would silently change every
/// aggregate computed downstream, so there is no skip-and-continue mode.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be opened, or
/// contains a row that fails to parse.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if !path.is_file() {
        bail!("sales data file not found: {}", path.display());
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: Record = result.with_context(|| format!("{}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

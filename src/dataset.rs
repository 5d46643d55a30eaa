use crate::errors::ArlError;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use tracing::info;

/// One row of the retail export, prior to cleaning.
#[derive(Clone, Debug)]
pub struct RetailRecord {
    pub invoice: String,
    pub stock_code: String,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub country: String,
}

const REQUIRED_COLUMNS: [&str; 6] = [
    "Invoice",
    "StockCode",
    "Description",
    "Quantity",
    "Price",
    "Country",
];

/// Read a comma-delimited retail export. The header row names the columns;
/// extra columns (InvoiceDate, Customer ID, ...) are ignored. Rows with a
/// missing required field or an unparseable number are skipped, not fatal —
/// the dataset ships with thousands of rows missing a description.
pub fn read_retail_csv(path: &str) -> Result<Vec<RetailRecord>, ArlError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut header = String::new();
    reader.read_line(&mut header)?;
    let names: Vec<&str> = header.trim_end().split(',').map(|s| s.trim()).collect();
    let mut columns: [usize; 6] = [0; 6];
    for (slot, wanted) in columns.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
        *slot = names
            .iter()
            .position(|name| name == wanted)
            .ok_or_else(|| ArlError::BadRecord {
                line: 1,
                reason: format!("missing column '{}'", wanted),
            })?;
    }

    let mut records: Vec<RetailRecord> = vec![];
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
        match parse_record(&fields, &columns) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    info!(
        read = records.len(),
        skipped, "loaded retail records from {}", path
    );
    Ok(records)
}

fn parse_record(fields: &[&str], columns: &[usize; 6]) -> Option<RetailRecord> {
    let get = |index: usize| -> Option<&str> {
        let field = *fields.get(columns[index])?;
        if field.is_empty() {
            None
        } else {
            Some(field)
        }
    };
    Some(RetailRecord {
        invoice: String::from(get(0)?),
        stock_code: String::from(get(1)?),
        description: String::from(get(2)?),
        quantity: get(3)?.parse().ok()?,
        price: get(4)?.parse().ok()?,
        country: String::from(get(5)?),
    })
}

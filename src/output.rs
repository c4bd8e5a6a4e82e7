//! Writes entries as CSV in the layout GnuCash's transaction importer takes.

use std::io::Write;

use anyhow::Result;
use serde_derive::Serialize;

use crate::money::format_amount;
use crate::transaction::Entry;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize)]
struct Record<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Account")]
    account: &'a str,
    #[serde(rename = "Amount Debit")]
    debit: Option<String>,
    #[serde(rename = "Amount Credit")]
    credit: Option<String>,
    #[serde(rename = "Transfer Account")]
    transfer_account: &'a str,
}

impl<'a> Record<'a> {
    fn new(entry: &'a Entry, transfer_account: &'a str) -> Self {
        let (debit, credit) = if entry.amount.is_sign_negative() {
            (None, Some(format_amount(entry.amount.abs())))
        } else {
            (Some(format_amount(entry.amount)), None)
        };
        Self {
            date: entry.date.format(DATE_FORMAT).to_string(),
            description: &entry.description,
            account: &entry.account,
            debit,
            credit,
            transfer_account,
        }
    }
}

/// Writes `entries` with a header row. Every entry transfers to or from
/// `transfer_account`.
pub fn write_entries(w: &mut dyn Write, entries: &[Entry], transfer_account: &str) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w);
    for entry in entries {
        csv_wtr.serialize(Record::new(entry, transfer_account))?;
    }
    if entries.is_empty() {
        // Serializing writes the header, so it must be written explicitly
        // when there are no records.
        csv_wtr.write_record([
            "Date",
            "Description",
            "Account",
            "Amount Debit",
            "Amount Credit",
            "Transfer Account",
        ])?;
    }
    csv_wtr.flush()?;
    Ok(())
}

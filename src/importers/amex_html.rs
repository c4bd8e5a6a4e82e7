//! Reads the American Express (americanexpress.com) UK statement activity
//! page, as saved from a browser.

use std::fmt;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::html::{comments, first_text, text_of};
use crate::money::parse_amount;
use crate::transaction::Transaction;

const DATE_FORMAT: &str = "%d %b %Y";
const MIN_CELLS: usize = 5;
const SAVED_FROM_MARKER: &str = "saved from url";

lazy_static! {
    static ref TABLE_BODY: Selector =
        Selector::parse(r#"tbody[data-testid="axp-activity-feed-transactions-table-body"]"#)
            .unwrap();
    static ref ROW: Selector = Selector::parse(r#"tr[data-testid^="transaction-row-"]"#).unwrap();
    static ref CELL: Selector = Selector::parse("td").unwrap();
    static ref DATE: Selector = Selector::parse("div.font-weight-regular").unwrap();
    static ref DESCRIPTION: Selector = Selector::parse("a").unwrap();
    static ref AMOUNT: Selector = Selector::parse("p").unwrap();
    static ref CARDHOLDER_BADGE: Selector = Selector::parse(r#"span[class*="_badge_"]"#).unwrap();
    static ref PERIOD_END: Regex = Regex::new(r"end=(\d{4})-(\d{2})-(\d{2})").unwrap();
}

/// How the year of each statement row is determined, as the rows themselves
/// only show the day and month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementYear {
    /// Every row is in the given year.
    Fixed(i32),
    /// The statement period ends on the given date. Rows are in its year,
    /// unless that would place them after it, in which case they are in the
    /// year before.
    EndingOn(NaiveDate),
}

impl StatementYear {
    /// Finds the statement period from the URL in the comment that browsers
    /// add to saved pages.
    pub fn from_document(doc: &Html) -> Option<Self> {
        comments(doc)
            .filter(|comment| comment.contains(SAVED_FROM_MARKER))
            .find_map(|comment| PERIOD_END.captures(comment))
            .and_then(|captures| {
                let year: i32 = captures[1].parse().ok()?;
                let month: u32 = captures[2].parse().ok()?;
                let day: u32 = captures[3].parse().ok()?;
                Some(match NaiveDate::from_ymd_opt(year, month, day) {
                    Some(end) => StatementYear::EndingOn(end),
                    None => StatementYear::Fixed(year),
                })
            })
    }

    /// Dates a row given its "DD Mon" text.
    pub fn date_of(&self, day_month: &str) -> Result<NaiveDate> {
        use StatementYear::*;
        match *self {
            Fixed(year) => parse_date_in(day_month, year),
            EndingOn(end) => match parse_date_in(day_month, end.year()) {
                Ok(date) if date > end => parse_date_in(day_month, end.year() - 1),
                Ok(date) => Ok(date),
                // 29 Feb only exists in leap years. It can still be in the
                // year before, as long as that puts it after the end.
                Err(e) => match parse_date_in(day_month, end.year() - 1) {
                    Ok(date) if (date.month(), date.day()) > (end.month(), end.day()) => Ok(date),
                    _ => Err(e),
                },
            },
        }
    }
}

impl fmt::Display for StatementYear {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use StatementYear::*;
        match self {
            Fixed(year) => write!(f, "{}", year),
            EndingOn(end) => write!(f, "{} (period ending {})", end.year(), end),
        }
    }
}

fn parse_date_in(day_month: &str, year: i32) -> Result<NaiveDate> {
    let s = format!("{} {}", day_month, year);
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .with_context(|| format!("parsing transaction date {:?}", s))
}

/// The transactions read from a statement page.
#[derive(Debug)]
pub struct Statement {
    /// The number of transaction rows on the page, including any that were
    /// skipped.
    pub row_count: usize,
    /// Settled transactions, oldest first.
    pub transactions: Vec<Transaction>,
}

pub fn parse_statement(doc: &Html, year: StatementYear) -> Result<Statement> {
    let body = doc
        .select(&TABLE_BODY)
        .next()
        .ok_or_else(|| anyhow!("could not find the transaction table in the statement"))?;

    let rows: Vec<ElementRef> = body.select(&ROW).collect();
    let mut transactions = Vec::with_capacity(rows.len());

    // The page lists the most recent transactions first.
    for row in rows.iter().rev() {
        match parse_row(*row, year) {
            Ok(RowOutcome::Settled(trn)) => transactions.push(trn),
            Ok(RowOutcome::Pending(description)) => match description {
                Some(d) => warn!("Skipping pending transaction: {}", d),
                None => warn!("Skipping a pending transaction (description not available)."),
            },
            Ok(RowOutcome::Incomplete) => {
                debug!("Skipping row {} with too few cells", row_id(*row));
            }
            Err(e) => warn!(
                "Skipping row {} due to a parsing error: {:#}",
                row_id(*row),
                e
            ),
        }
    }

    Ok(Statement {
        row_count: rows.len(),
        transactions,
    })
}

#[derive(Debug)]
enum RowOutcome {
    Settled(Transaction),
    /// Not yet settled, with its description if one could be found.
    Pending(Option<String>),
    Incomplete,
}

fn row_id(row: ElementRef<'_>) -> &str {
    row.value().attr("data-testid").unwrap_or("<unknown>")
}

fn parse_row(row: ElementRef, year: StatementYear) -> Result<RowOutcome> {
    let cells: Vec<ElementRef> = row.select(&CELL).collect();
    if cells.len() < MIN_CELLS {
        return Ok(RowOutcome::Incomplete);
    }

    let description = first_text(cells[2], &DESCRIPTION);
    if text_of(cells[1]).to_lowercase().contains("pending") {
        return Ok(RowOutcome::Pending(description));
    }

    let day_month = first_text(cells[0], &DATE).ok_or_else(|| anyhow!("no date"))?;
    let date = year.date_of(&day_month)?;
    let description = description.ok_or_else(|| anyhow!("no description"))?;
    let amount_text = first_text(cells[4], &AMOUNT).ok_or_else(|| anyhow!("no amount"))?;
    let amount = parse_amount(&amount_text)?;

    let cardholder = row
        .select(&CARDHOLDER_BADGE)
        .next()
        .map(text_of)
        .filter(|initials| !initials.is_empty());

    Ok(RowOutcome::Settled(Transaction {
        date,
        description,
        amount,
        cardholder,
    }))
}

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A settled line read from the statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive for a charge against the card, negative for a credit.
    pub amount: Decimal,
    /// Initials of the supplementary cardholder who made the transaction, if
    /// not the main cardholder.
    pub cardholder: Option<String>,
}

/// A categorized transaction, ready to be written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub description: String,
    pub account: String,
    pub amount: Decimal,
}

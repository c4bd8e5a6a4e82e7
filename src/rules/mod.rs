//! Configuration of the accounts that transactions are assigned to.

use anyhow::{bail, Context, Result};
use serde_derive::Deserialize;

use crate::filespec::FileSpec;

mod table;

pub use table::Table;

const DEFAULT_RULES: &str = include_str!("default.ron");

#[derive(Debug, Deserialize)]
pub struct Config {
    /// The account of the credit card itself. Every entry is a transfer
    /// between this and the categorized account.
    pub credit_card_account: String,
    /// The account of transactions that no rule matches.
    pub default_account: String,
    pub delivery: Delivery,
    pub rules: Table,
}

/// Identifies charges for delivery orders, whose descriptions are replaced
/// with the restaurant name when the order can be found.
#[derive(Debug, Deserialize)]
pub struct Delivery {
    /// Matched case-insensitively against the statement description.
    pub keyword: String,
    pub account: String,
    /// Prefixes the restaurant name in the new description.
    pub label: String,
}

impl Config {
    /// The rules built into the program.
    pub fn builtin() -> Result<Self> {
        Self::from_str(DEFAULT_RULES).context("parsing built-in rules")
    }

    pub fn from_filespec(file_spec: &FileSpec) -> Result<Self> {
        let reader = file_spec.reader()?;
        let config: Config = ron::de::from_reader(reader)
            .with_context(|| format!("parsing rules file {}", file_spec))?;
        config
            .prepare()
            .with_context(|| format!("in rules file {}", file_spec))
    }

    pub fn from_str(s: &str) -> Result<Self> {
        let config: Config = ron::de::from_str(s)?;
        config.prepare()
    }

    fn prepare(mut self) -> Result<Self> {
        if self.credit_card_account.is_empty() {
            bail!("credit_card_account must not be empty");
        }
        if self.default_account.is_empty() {
            bail!("default_account must not be empty");
        }
        self.delivery.keyword = self.delivery.keyword.trim().to_uppercase();
        if self.delivery.keyword.is_empty() {
            bail!("delivery keyword must not be empty");
        }
        if self.delivery.account.is_empty() {
            bail!("delivery account must not be empty");
        }
        self.rules.prepare()?;
        Ok(self)
    }
}

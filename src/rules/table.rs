use anyhow::{bail, Result};
use serde_derive::Deserialize;

/// Keyword rules, tried in order.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct Table(Vec<Rule>);

#[derive(Debug, Deserialize)]
pub struct Rule {
    pub account: String,
    pub keywords: Vec<String>,
}

impl Table {
    #[cfg(test)]
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut table = Self(rules);
        table.prepare()?;
        Ok(table)
    }

    /// Validates the rules and upper-cases their keywords.
    pub(super) fn prepare(&mut self) -> Result<()> {
        for rule in &mut self.0 {
            if rule.account.is_empty() {
                bail!("rule with keywords {:?} has an empty account", rule.keywords);
            }
            for keyword in &mut rule.keywords {
                *keyword = keyword.trim().to_uppercase();
                if keyword.is_empty() {
                    bail!("rule for account {:?} has an empty keyword", rule.account);
                }
            }
        }
        Ok(())
    }

    /// The account of the first rule with a keyword contained in
    /// `description`.
    pub fn account_for(&self, description: &str) -> Option<&str> {
        let description = description.to_uppercase();
        self.0
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| description.contains(k.as_str())))
            .map(|rule| rule.account.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

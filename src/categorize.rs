use log::debug;

use crate::orders::DeliveryOrders;
use crate::rules::Config;
use crate::transaction::{Entry, Transaction};

/// Assigns accounts to transactions, replacing the descriptions of delivery
/// charges with the restaurant ordered from.
pub struct Categorizer<'a> {
    config: &'a Config,
    orders: DeliveryOrders,
}

impl<'a> Categorizer<'a> {
    pub fn new(config: &'a Config, orders: DeliveryOrders) -> Self {
        Self { config, orders }
    }

    pub fn categorize(&mut self, trn: Transaction) -> Entry {
        let mut account = self.config.default_account.as_str();
        let mut description = trn.description;

        let delivery = &self.config.delivery;
        if description.to_uppercase().contains(&delivery.keyword) {
            match self.orders.take(trn.date, trn.amount.abs()) {
                Some(restaurant) => {
                    description = format!("{}: {}", delivery.label, restaurant);
                }
                None => debug!(
                    "No {} order found on {} for {}",
                    delivery.label,
                    trn.date,
                    trn.amount.abs()
                ),
            }
            account = delivery.account.as_str();
        }

        if let Some(rule_account) = self.config.rules.account_for(&description) {
            account = rule_account;
        }

        if let Some(initials) = trn.cardholder {
            description = format!("{} ({})", description, initials);
        }

        Entry {
            date: trn.date,
            description,
            account: account.to_string(),
            amount: trn.amount,
        }
    }

    /// Orders that no transaction has been matched with so far.
    pub fn unmatched_orders(&self) -> usize {
        self.orders.len()
    }
}

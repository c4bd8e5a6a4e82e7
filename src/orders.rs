//! Lookup of delivery orders by the date and amount that they are charged
//! with.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::money::key_amount;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct OrderKey {
    date: NaiveDate,
    amount: Decimal,
}

impl OrderKey {
    fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self {
            date,
            amount: key_amount(amount),
        }
    }
}

/// Restaurant names of delivery orders. Each order can be taken at most once,
/// orders with the same date and amount being taken in the order they were
/// added.
#[derive(Debug, Default)]
pub struct DeliveryOrders {
    orders: HashMap<OrderKey, VecDeque<String>>,
}

impl DeliveryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, amount: Decimal, restaurant: String) {
        self.orders
            .entry(OrderKey::new(date, amount))
            .or_default()
            .push_back(restaurant);
    }

    /// Removes and returns the first remaining restaurant ordered from on
    /// `date` for `amount`.
    pub fn take(&mut self, date: NaiveDate, amount: Decimal) -> Option<String> {
        let key = OrderKey::new(date, amount);
        let restaurants = self.orders.get_mut(&key)?;
        let restaurant = restaurants.pop_front();
        if restaurants.is_empty() {
            self.orders.remove(&key);
        }
        restaurant
    }

    /// The number of orders not yet taken.
    pub fn len(&self) -> usize {
        self.orders.values().map(VecDeque::len).sum()
    }
}

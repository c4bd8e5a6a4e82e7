//! Reads the Deliveroo (deliveroo.co.uk) order history page, as saved from a
//! browser.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::{info, warn};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::filespec::{self, FileSpec};
use crate::html::text_of;
use crate::money::parse_amount;
use crate::orders::DeliveryOrders;

const DATE_FORMAT: &str = "%d %B %Y";
const DETAILS_SEPARATOR: char = '•';

lazy_static! {
    static ref ORDER_ITEM: Selector = Selector::parse("li.OrderList-550fb988658cc6b5").unwrap();
    static ref ORDER_TEXT: Selector = Selector::parse("p.ccl-2d0aeb0c9725ce8b").unwrap();
}

/// Loads the orders from `input`. The order history is optional, so problems
/// reading it are logged and an empty set of orders is returned.
pub fn load_orders(input: &FileSpec) -> DeliveryOrders {
    let content = match filespec::read_optional_file(input) {
        Ok(Some(content)) => content,
        Ok(None) => {
            warn!(
                "Deliveroo orders file {} not found. Deliveroo transactions will not be detailed.",
                input
            );
            return DeliveryOrders::new();
        }
        Err(e) => {
            warn!("Could not read Deliveroo orders file: {:#}", e);
            return DeliveryOrders::new();
        }
    };

    let orders = parse_orders(&Html::parse_document(&content));
    info!("Found {} Deliveroo orders.", orders.len());
    orders
}

pub fn parse_orders(doc: &Html) -> DeliveryOrders {
    let mut orders = DeliveryOrders::new();
    for item in doc.select(&ORDER_ITEM) {
        match parse_order(item) {
            Ok(order) => orders.add(order.date, order.amount, order.restaurant),
            // Cancelled orders and the like lack some of the details.
            Err(e) => warn!("Skipping a Deliveroo order item due to parsing error: {:#}", e),
        }
    }
    orders
}

#[derive(Debug, PartialEq, Eq)]
struct Order {
    restaurant: String,
    amount: Decimal,
    date: NaiveDate,
}

fn parse_order(item: ElementRef) -> Result<Order> {
    let mut texts = item.select(&ORDER_TEXT);
    let first = texts.next().ok_or_else(|| anyhow!("no restaurant name"))?;
    // The last text holds both amount and date, e.g. "£ 85.93 • 13 July 2025".
    let last = texts.last().unwrap_or(first);

    let restaurant = text_of(first);
    let details = text_of(last);
    let parts: Vec<&str> = details.split(DETAILS_SEPARATOR).map(str::trim).collect();
    let (amount, date) = match parts.as_slice() {
        [amount, date] => (*amount, *date),
        _ => return Err(anyhow!("expected amount and date in {:?}", details)),
    };

    Ok(Order {
        restaurant,
        amount: parse_amount(amount)?,
        date: NaiveDate::parse_from_str(date, DATE_FORMAT)
            .with_context(|| format!("parsing order date {:?}", date))?,
    })
}

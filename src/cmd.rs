use anyhow::{anyhow, Result};
use chrono::Datelike;
use clap::Parser;
use log::{debug, info, warn};
use scraper::Html;

use crate::categorize::Categorizer;
use crate::filespec::{self, FileSpec};
use crate::importers::amex_html::{self, Statement, StatementYear};
use crate::importers::deliveroo_html;
use crate::orders::DeliveryOrders;
use crate::output;
use crate::rules::Config;
use crate::transaction::Entry;

const DEFAULT_OUTPUT: &str = "amex_gnucash_categorized.csv";

#[derive(Debug, Parser)]
#[command(version)]
/// Converts an American Express (americanexpress.com) statement page to a
/// categorized CSV file for import into GnuCash.
pub struct Command {
    /// The statement activity page, as saved from the browser. "-" reads from
    /// stdin.
    statement: FileSpec,
    /// The Deliveroo order history page, as saved from the browser. Used to
    /// name the restaurant of Deliveroo transactions.
    orders: Option<FileSpec>,
    /// The CSV file to write to (replacing any existing file). "-" writes to
    /// stdout.
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    output: FileSpec,
    /// RON file of the accounts and categorization rules to use instead of
    /// the built-in ones.
    #[arg(short = 'r', long = "rules")]
    rules: Option<FileSpec>,
    /// The year of the statement, when it cannot be found from the page.
    #[arg(long = "year")]
    year: Option<i32>,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let config = match &self.rules {
            Some(rules) => Config::from_filespec(rules)?,
            None => Config::builtin()?,
        };
        debug!("Using {} categorization rules", config.rules.len());

        let content = filespec::read_optional_file(&self.statement)?
            .ok_or_else(|| anyhow!("the statement file {} was not found", self.statement))?;
        let doc = Html::parse_document(&content);
        let year = self.statement_year(&doc);

        let orders = match &self.orders {
            Some(orders) => deliveroo_html::load_orders(orders),
            None => {
                info!("No Deliveroo orders file given. Deliveroo transactions will not be detailed.");
                DeliveryOrders::new()
            }
        };

        let statement = amex_html::parse_statement(&doc, year)?;
        if statement.row_count == 0 {
            info!("No transactions found in the statement.");
            return Ok(());
        }
        info!(
            "Found {} transactions for the year {}. Processing...",
            statement.row_count, year
        );

        let (entries, unmatched_orders) = convert(statement, orders, &config);
        filespec::write_with(&self.output, |w| {
            output::write_entries(w, &entries, &config.credit_card_account)
        })?;

        if unmatched_orders > 0 {
            debug!(
                "{} Deliveroo orders did not match any transaction.",
                unmatched_orders
            );
        }
        info!(
            "Successfully converted {} transactions to {}.",
            entries.len(),
            self.output
        );
        Ok(())
    }

    fn statement_year(&self, doc: &Html) -> StatementYear {
        if let Some(year) = self.year {
            return StatementYear::Fixed(year);
        }
        StatementYear::from_document(doc).unwrap_or_else(|| {
            let year = chrono::Local::now().year();
            warn!(
                "Could not find the statement year. Using the current year ({}) instead.",
                year
            );
            StatementYear::Fixed(year)
        })
    }
}

/// Categorizes each transaction of the statement, returning the entries and
/// the number of orders that were not matched with a transaction.
fn convert(statement: Statement, orders: DeliveryOrders, config: &Config) -> (Vec<Entry>, usize) {
    let mut categorizer = Categorizer::new(config, orders);
    let entries = statement
        .transactions
        .into_iter()
        .map(|trn| categorizer.categorize(trn))
        .collect();
    (entries, categorizer.unmatched_orders())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use goldenfile::Mint;

    use super::*;
    use crate::importers::deliveroo_html::parse_orders;
    use crate::testutil::{amex_page, amex_row};

    const STATEMENT_HTML: &str = "testdata/amex_statement.html";
    const ORDERS_HTML: &str = "testdata/deliveroo_orders.html";

    fn golden_test(statement_path: &str, orders_path: Option<&str>, golden_path: &str) {
        let mut mint = Mint::new("testdata/convert");
        let differ = Box::new(goldenfile::differs::text_diff);
        let mut out = mint
            .new_goldenfile_with_differ(golden_path, differ)
            .expect("new goldenfile");

        let config = Config::builtin().expect("built-in rules");
        let statement_html = std::fs::read_to_string(statement_path).expect("read statement");
        let doc = Html::parse_document(&statement_html);
        let year = StatementYear::from_document(&doc).expect("statement year");
        let statement = amex_html::parse_statement(&doc, year).expect("parse statement");
        let orders = match orders_path {
            Some(path) => {
                let orders_html = std::fs::read_to_string(path).expect("read orders");
                parse_orders(&Html::parse_document(&orders_html))
            }
            None => DeliveryOrders::new(),
        };

        let (entries, _) = convert(statement, orders, &config);
        let mut csv = Vec::new();
        output::write_entries(&mut csv, &entries, &config.credit_card_account)
            .expect("write entries");
        out.write_all(&csv).expect("write output");
    }

    #[test]
    fn golden_statement_with_orders() {
        golden_test(STATEMENT_HTML, Some(ORDERS_HTML), "amex_statement.csv");
    }

    #[test]
    fn golden_statement_without_orders() {
        golden_test(STATEMENT_HTML, None, "amex_statement_no_orders.csv");
    }

    fn command(args: &[&str]) -> Command {
        Command::try_parse_from(std::iter::once("statementcsv").chain(args.iter().copied()))
            .expect("parse arguments")
    }

    #[test]
    fn run_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.csv");
        let out = out_path.to_str().unwrap();
        command(&[STATEMENT_HTML, ORDERS_HTML, "-o", out]).run().unwrap();
        let got = std::fs::read_to_string(&out_path).unwrap();
        let want = std::fs::read_to_string("testdata/convert/amex_statement.csv").unwrap();
        assert_eq!(got, want);
    }

    #[test]
    fn run_without_rows_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let statement_path = dir.path().join("statement.html");
        std::fs::write(&statement_path, amex_page(None, &[])).unwrap();
        let out_path = dir.path().join("out.csv");
        command(&[
            statement_path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ])
        .run()
        .unwrap();
        assert!(!out_path.exists());
    }

    #[test]
    fn run_with_year_override() {
        let dir = tempfile::tempdir().unwrap();
        let statement_path = dir.path().join("statement.html");
        std::fs::write(
            &statement_path,
            amex_page(None, &[amex_row("01 Mar", "", "SMARTY MOBILE", "£10.00")]),
        )
        .unwrap();
        let out_path = dir.path().join("out.csv");
        command(&[
            statement_path.to_str().unwrap(),
            "--year",
            "2023",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .run()
        .unwrap();
        let got = std::fs::read_to_string(&out_path).unwrap();
        assert!(got.ends_with(
            "2023-03-01,SMARTY MOBILE,Despesas:Celular,10.00,,Total:Passivo:Cartão de Crédito:Amex\n"
        ));
    }

    #[test]
    fn run_missing_statement_fails() {
        let dir = tempfile::tempdir().unwrap();
        let statement_path = dir.path().join("missing.html");
        let err = command(&[statement_path.to_str().unwrap()]).run().unwrap_err();
        assert!(format!("{:#}", err).contains("was not found"));
    }

    #[test]
    fn run_with_custom_rules() {
        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.ron");
        std::fs::write(
            &rules_path,
            r#"(
                credit_card_account: "liabilities:amex",
                default_account: "expenses:unknown",
                delivery: (keyword: "DELIVEROO", account: "expenses:takeaway", label: "Takeaway"),
                rules: [(account: "expenses:shops", keywords: ["shop"])],
            )"#,
        )
        .unwrap();
        let out_path = dir.path().join("out.csv");
        command(&[
            STATEMENT_HTML,
            ORDERS_HTML,
            "-r",
            rules_path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ])
        .run()
        .unwrap();
        let got = std::fs::read_to_string(&out_path).unwrap();
        assert!(got.contains("2025-07-09,CORNER SHOP,expenses:shops,3.20,,liabilities:amex\n"));
        assert!(got.contains("2025-07-13,Takeaway: Dishoom,expenses:takeaway,85.93,,liabilities:amex\n"));
        assert!(got.contains("2025-07-10,UNIQLO LONDON,expenses:unknown,1024.00,,liabilities:amex\n"));
    }
}

use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn deliveroo_item(restaurant: &str, details: &str) -> String {
    format!(
        "<li class=\"OrderList-550fb988658cc6b5\">\
         <p class=\"ccl-2d0aeb0c9725ce8b\">{}</p>\
         <p class=\"ccl-2d0aeb0c9725ce8b\">{}</p></li>",
        restaurant, details
    )
}

pub fn deliveroo_page(items: &[String]) -> String {
    textwrap::dedent(&format!(
        r#"
        <html>
          <body>
            <ul>{}</ul>
          </body>
        </html>
        "#,
        items.concat(),
    ))
}

/// A statement row with the cells the statement importer reads.
pub fn amex_row(day_month: &str, status: &str, description: &str, amount: &str) -> String {
    format!(
        "<tr data-testid=\"transaction-row-{desc}\">\
         <td><div class=\"font-weight-regular\">{day_month}</div></td>\
         <td>{status}</td>\
         <td><a href=\"#\">{desc}</a></td>\
         <td></td>\
         <td><p>{amount}</p></td></tr>",
        day_month = day_month,
        status = status,
        desc = description,
        amount = amount,
    )
}

pub fn amex_page(saved_from: Option<&str>, rows: &[String]) -> String {
    let comment = saved_from
        .map(|url| format!("<!-- saved from url=(0090){} -->", url))
        .unwrap_or_default();
    textwrap::dedent(&format!(
        r#"
        <!DOCTYPE html>
        {}
        <html>
          <body>
            <table>
              <tbody data-testid="axp-activity-feed-transactions-table-body">{}</tbody>
            </table>
          </body>
        </html>
        "#,
        comment,
        rows.concat(),
    ))
}

pub mod amex_html;
pub mod deliveroo_html;

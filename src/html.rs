//! Helpers over `scraper` for reading pages saved from a browser.

use scraper::{ElementRef, Html, Selector};

/// The text content of the element and its descendants, trimmed.
pub fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first descendant matching `selector`.
pub fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(text_of)
}

/// All comments in the document, in document order.
pub fn comments(doc: &Html) -> impl Iterator<Item = &str> {
    doc.tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_comment())
        .map(|comment| &**comment)
}

use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

use crate::models::Property;

/// Column widths: ID, Location, Price (including the `$`), Beds. Status is unpadded.
const ID_WIDTH: usize = 5;
const LOCATION_WIDTH: usize = 20;
const PRICE_WIDTH: usize = 10;
const BEDS_WIDTH: usize = 7;

const SEPARATOR_WIDTH: usize = 50;

/// Left-align `text` in a column of `width` display cells
/// Longer text is never truncated, so a wide value pushes later columns right.
pub fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - used))
    }
}

/// Column header line
pub fn header() -> String {
    format!(
        "{}{}{}{}Status",
        pad("ID", ID_WIDTH),
        pad("Location", LOCATION_WIDTH),
        pad("Price", PRICE_WIDTH),
        pad("Beds", BEDS_WIDTH),
    )
}

/// Rule printed under the header
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// One table row; `status` is passed in so callers can colorize it
pub fn row(property: &Property, status: impl Display) -> String {
    format!(
        "{}{}${}{}{}",
        pad(&property.id, ID_WIDTH),
        pad(&property.location, LOCATION_WIDTH),
        pad(&property.price, PRICE_WIDTH),
        pad(&property.bedrooms, BEDS_WIDTH),
        status
    )
}

/// Plain-text table (header, rule, rows), one line per entry, newline-terminated
pub fn render<'a>(properties: impl IntoIterator<Item = &'a Property>) -> String {
    let mut out = String::new();
    out.push_str(&header());
    out.push('\n');
    out.push_str(&separator());
    out.push('\n');
    for property in properties {
        out.push_str(&row(property, &property.status));
        out.push('\n');
    }
    out
}

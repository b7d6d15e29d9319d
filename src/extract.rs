//! Best-effort scrape of product cards out of free-form assistant replies.
//!
//! The model is only asked to format recommendations "clearly"; nothing
//! enforces the markup this module looks for. The pattern expects, per
//! product, a bold name (`**Name**`), then `Price:` (optionally bolded as
//! `Price:**`) followed by an amount, then an `image` token followed by a
//! locator. Replies that drift from that shape simply render as plain text.
//! Extracted values are not validated: `price` may not parse as a number and
//! `image` may not be a usable locator.

use std::sync::OnceLock;

use regex::Regex;

const PRODUCT_PATTERN: &str =
    r#"(?i)\*\*(.+?)\*\*[\s\S]*?Price:(?:\*\*)?\s*\$?([0-9.]+)[\s\S]*?image["\s:]*([^\s"]+)"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub image: String,
}

impl ProductCard {
    /// Numeric price, or `None` when the captured digits are not a number (e.g. `1.2.3`).
    pub fn price_value(&self) -> Option<f64> {
        self.price.parse().ok()
    }
}

fn product_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PRODUCT_PATTERN).expect("product pattern is a valid regex"))
}

/// All product mentions in `reply`, or `None` when the reply should render as plain text.
pub fn extract_products(reply: &str) -> Option<Vec<ProductCard>> {
    let cards: Vec<ProductCard> = product_regex()
        .captures_iter(reply)
        .map(|caps| ProductCard {
            name: caps[1].to_string(),
            price: caps[2].to_string(),
            image: caps[3].to_string(),
        })
        .collect();

    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

/// Text before the first bold marker; the prose shown above a card grid.
pub fn leading_prose(reply: &str) -> &str {
    reply.split("**").next().unwrap_or_default()
}

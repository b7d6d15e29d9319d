// Terminal rendering of transcript entries.

use reqwest::Url;

use crate::extract::{extract_products, leading_prose, ProductCard};
use crate::session::{ChatMessage, Role};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/200x200?text=No+Image";

/// The card's image locator, or the placeholder when it cannot be loaded as-is.
pub fn card_image(card: &ProductCard) -> &str {
    match Url::parse(&card.image) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "data") => card.image.as_str(),
        _ => PLACEHOLDER_IMAGE,
    }
}

fn render_card(card: &ProductCard) -> String {
    format!(
        "  ┌ {}\n  │ ${}\n  └ {}",
        card.name,
        card.price,
        card_image(card)
    )
}

pub fn render_message(msg: &ChatMessage) -> String {
    match msg.role {
        Role::User => {
            let mut out = format!("You: {}", msg.content);
            if msg.image.is_some() {
                out.push_str(" [image attached]");
            }
            out
        }
        Role::Assistant => match extract_products(&msg.content) {
            Some(cards) => {
                let mut out = format!("CartPilot: {}", leading_prose(&msg.content).trim_end());
                for card in &cards {
                    out.push('\n');
                    out.push_str(&render_card(card));
                }
                out
            }
            None => format!("CartPilot: {}", msg.content),
        },
    }
}

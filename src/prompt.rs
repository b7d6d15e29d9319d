use anyhow::{Context, Result};
use minijinja::{context, Environment};

use crate::catalog::Catalog;

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are CartPilot, a helpful AI shopping agent for an e-commerce store.

Your capabilities:
1. Answer general questions about yourself and what you can do
2. Recommend products based on text descriptions
3. Identify and recommend products from images

Product Catalog ({{ product_count }} items):
{{ catalog_json }}

Instructions:
- For general questions: Introduce yourself as CartPilot and explain your capabilities
- For product recommendations: Search the catalog and suggest 2-4 relevant items with details
- For image-based queries: Identify what's in the image and recommend similar products from the catalog
- Always be friendly, concise, and helpful
- Format product recommendations clearly with name, price, and why you recommend it
- If no suitable products exist, politely say so and suggest alternatives"#;

/// Renders the fixed system instruction with the whole catalog embedded.
pub fn render_system_prompt(catalog: &Catalog) -> Result<String> {
    let catalog_json = catalog
        .to_pretty_json()
        .context("Failed to serialize product catalog")?;

    let mut env = Environment::new();
    env.add_template("system_prompt", SYSTEM_PROMPT_TEMPLATE)
        .context("Failed to register system prompt template")?;
    let tmpl = env
        .get_template("system_prompt")
        .context("System prompt template missing")?;
    tmpl.render(context! {
        product_count => catalog.len(),
        catalog_json => catalog_json,
    })
    .context("Failed to render system prompt")
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

/// One dataset record, kept exactly as it appears in the file so the prompt
/// embeds it verbatim. Typed views are read on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Value);

impl Product {
    pub fn new(record: Value) -> Self {
        Self(record)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn price(&self) -> Option<&Value> {
        self.0.get("price")
    }

    pub fn image(&self) -> Option<&str> {
        self.str_field("image")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn record(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Product {
    fn from(record: Value) -> Self {
        Self(record)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only product list, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let products: Vec<Product> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { products })
    }

    /// Like [`Catalog::load`], but a missing or corrupt dataset degrades to an
    /// empty catalog instead of failing startup.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(catalog) => {
                info!(
                    path = %path.as_ref().display(),
                    products = catalog.len(),
                    "Loaded product catalog"
                );
                catalog
            }
            Err(e) => {
                error!("Error loading products: {}", e);
                Self::default()
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"id": 1, "name": "Running Tee", "price": 19.99, "image": "https://cdn.example.com/tee.png", "category": "Apparel"},
        {"id": 2, "name": "Yoga Mat", "price": "34.50", "category": ["Fitness", "Yoga"], "description": "Non-slip"},
        {"id": 3, "title": "Water Bottle", "cost": 9}
    ]"#;

    #[test]
    fn test_load_keeps_every_record_regardless_of_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, SAMPLE).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);

        let tee = &catalog.products()[0];
        assert_eq!(tee.name(), Some("Running Tee"));
        assert_eq!(tee.price(), Some(&json!(19.99)));
        assert_eq!(tee.category(), Some("Apparel"));

        let mat = &catalog.products()[1];
        assert_eq!(mat.price(), Some(&json!("34.50")));
        assert_eq!(mat.category(), None);
        assert_eq!(mat.image(), None);
        assert_eq!(mat.record()["category"], json!(["Fitness", "Yoga"]));

        assert_eq!(catalog.products()[2].name(), None);
    }

    #[test]
    fn test_serialization_preserves_field_order_and_adds_nothing() {
        let catalog = Catalog::new(vec![Product::new(
            serde_json::from_str(r#"{"id":7,"name":"Tee","price":1}"#).unwrap(),
        )]);
        let compact = serde_json::to_string(catalog.products()).unwrap();
        assert_eq!(compact, r#"[{"id":7,"name":"Tee","price":1}]"#);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Catalog::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_load_or_empty_degrades_to_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{\"products\": []}").unwrap();
        let catalog = Catalog::load_or_empty(&path);
        assert!(catalog.is_empty());

        let missing = Catalog::load_or_empty(dir.path().join("missing.json"));
        assert_eq!(missing.len(), 0);
    }
}

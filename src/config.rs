use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CATALOG_PATH: &str = "products.json";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Settings for the relay server, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub catalog_path: PathBuf,
    pub vision_model: String,
    pub text_model: String,
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base of the relay API, e.g. `http://localhost:3001/api`.
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.api_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_defaults() {
        let cfg = RelayConfig::default();
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.vision_model, "gpt-4o");
        assert_eq!(cfg.text_model, "gpt-4o-mini");
        assert_eq!(cfg.catalog_path, PathBuf::from("products.json"));
    }

    #[test]
    fn test_chat_url_joins_without_double_slash() {
        let cfg = ClientConfig {
            api_url: "http://127.0.0.1:4000/api/".to_string(),
        };
        assert_eq!(cfg.chat_url(), "http://127.0.0.1:4000/api/chat");
        assert_eq!(ClientConfig::default().chat_url(), "http://localhost:3001/api/chat");
    }
}

use crate::adapters::http::{Endpoints, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::model::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{
    validate_contains_placeholder, validate_path_template, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

/// 覆寫預設的 API 路徑
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub list: Option<String>,
    pub create: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub low_stock_threshold: Option<i64>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl StoreConfig {
    /// 只指定後端位址，其餘使用預設值
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                base_url: base_url.into(),
                timeout_seconds: None,
                headers: None,
            },
            endpoints: EndpointsConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.backend.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.backend.headers.clone().unwrap_or_default()
    }

    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            list: self.endpoints.list.clone().unwrap_or(defaults.list),
            create: self.endpoints.create.clone().unwrap_or(defaults.create),
            update: self.endpoints.update.clone().unwrap_or(defaults.update),
            delete: self.endpoints.delete.clone().unwrap_or(defaults.delete),
        }
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.inventory
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("backend.base_url", &self.backend.base_url)?;

        if let Some(timeout) = self.backend.timeout_seconds {
            validate_range("backend.timeout_seconds", timeout, 1, 300)?;
        }

        // 未替換的環境變數通常代表漏設
        for (key, value) in self.headers() {
            if env_var_pattern().is_match(&value) {
                return Err(StoreError::InvalidConfigValueError {
                    field: format!("backend.headers.{}", key),
                    value,
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        let endpoints = self.endpoints();
        validate_path_template("endpoints.list", &endpoints.list)?;
        validate_path_template("endpoints.create", &endpoints.create)?;
        validate_path_template("endpoints.update", &endpoints.update)?;
        validate_path_template("endpoints.delete", &endpoints.delete)?;
        validate_contains_placeholder("endpoints.update", &endpoints.update, "{id}")?;
        validate_contains_placeholder("endpoints.delete", &endpoints.delete, "{id}")?;

        if let Some(threshold) = self.inventory.low_stock_threshold {
            validate_range("inventory.low_stock_threshold", threshold, 0, i64::MAX)?;
        }

        Ok(())
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost:5000"
"#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(config.endpoints(), Endpoints::default());
        assert_eq!(config.low_stock_threshold(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = StoreConfig::from_toml_str(
            r#"
[backend]
base_url = "https://inventory.example.com"
timeout_seconds = 10

[backend.headers]
X-Client = "inventory-store"

[endpoints]
list = "/v2/items"
delete = "/v2/items/{id}"

[inventory]
low_stock_threshold = 12
"#,
        )
        .unwrap();

        let endpoints = config.endpoints();
        assert_eq!(endpoints.list, "/v2/items");
        assert_eq!(endpoints.create, "/api/add-item");
        assert_eq!(endpoints.delete, "/v2/items/{id}");
        assert_eq!(config.headers().get("X-Client").unwrap(), "inventory-store");
        assert_eq!(config.low_stock_threshold(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INVENTORY_STORE_TEST_TOKEN", "s3cret");

        let config = StoreConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost:5000"

[backend.headers]
Authorization = "Bearer ${INVENTORY_STORE_TEST_TOKEN}"
"#,
        )
        .unwrap();
        assert_eq!(config.headers().get("Authorization").unwrap(), "Bearer s3cret");

        std::env::remove_var("INVENTORY_STORE_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = StoreConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost:5000"

[backend.headers]
Authorization = "Bearer ${INVENTORY_STORE_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_errors() {
        let bad_url = StoreConfig::new("invalid-url");
        assert!(bad_url.validate().is_err());

        let mut missing_placeholder = StoreConfig::new("http://localhost:5000");
        missing_placeholder.endpoints.update = Some("/api/items".to_string());
        assert!(missing_placeholder.validate().is_err());

        let mut bad_timeout = StoreConfig::new("http://localhost:5000");
        bad_timeout.backend.timeout_seconds = Some(0);
        assert!(bad_timeout.validate().is_err());

        let mut negative_threshold = StoreConfig::new("http://localhost:5000");
        negative_threshold.inventory.low_stock_threshold = Some(-1);
        assert!(negative_threshold.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("[backend\nbase_url = 1").unwrap_err();
        assert!(matches!(err, StoreError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[backend]\nbase_url = \"http://127.0.0.1:8080\"\n")
            .unwrap();

        let config = StoreConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");

        let overridden = config.with_base_url("http://other:9000");
        assert_eq!(overridden.base_url(), "http://other:9000");
    }
}

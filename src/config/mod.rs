pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use self::toml_config::StoreConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-store")]
#[command(about = "Manage inventory items on a REST backend")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend base URL (overrides the configuration file)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Stock count at or below which an item is low stock")]
    pub low_stock_threshold: Option<i64>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, help = "Log output format")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// 日誌輸出格式；`json` 給交由日誌收集器處理的環境使用
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch and print every item
    List {
        #[arg(long, help = "Only print low-stock items")]
        low_stock: bool,
    },
    /// Create an item
    Add(FormArgs),
    /// Update an existing item
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete an item
    Delete { id: String },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    #[arg(long = "field", value_name = "KEY=VALUE", help = "Form text field, repeatable")]
    pub fields: Vec<String>,

    #[arg(long = "file", value_name = "FIELD=PATH", help = "File upload, repeatable")]
    pub files: Vec<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::from_file(path)?,
            None => StoreConfig::new(DEFAULT_BASE_URL),
        };

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(threshold) = self.low_stock_threshold {
            config.inventory.low_stock_threshold = Some(threshold);
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.store_config()?.validate()?;

        let form = match &self.command {
            Command::Add(form) | Command::Edit { form, .. } => Some(form),
            _ => None,
        };
        if let Some(form) = form {
            for raw in &form.fields {
                cli::parse_pair("--field", raw)?;
            }
            for raw in &form.files {
                cli::parse_pair("--file", raw)?;
            }
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_command() {
        let config = CliConfig::parse_from([
            "inventory-store",
            "--base-url",
            "http://inventory.local:8080",
            "edit",
            "abc123",
            "--field",
            "stock=4",
            "--file",
            "image=./widget.png",
        ]);

        match &config.command {
            Command::Edit { id, form } => {
                assert_eq!(id, "abc123");
                assert_eq!(form.fields, vec!["stock=4"]);
                assert_eq!(form.files, vec!["image=./widget.png"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(
            config.store_config().unwrap().base_url(),
            "http://inventory.local:8080"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_base_url_and_threshold_override() {
        let config =
            CliConfig::parse_from(["inventory-store", "--low-stock-threshold", "9", "list"]);
        let store_config = config.store_config().unwrap();

        assert_eq!(store_config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(store_config.low_stock_threshold(), 9);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_log_format() {
        let config = CliConfig::parse_from(["inventory-store", "--log-format", "json", "list"]);
        assert_eq!(config.log_format, LogFormat::Json);

        let rejected = CliConfig::try_parse_from(["inventory-store", "--log-format", "xml", "list"]);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_malformed_field_fails_validation() {
        let config = CliConfig::parse_from(["inventory-store", "add", "--field", "no-equals"]);
        assert!(config.validate().is_err());
    }
}

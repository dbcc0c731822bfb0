use clap::Parser;
use inventory_store::config::{cli::load_form, Command, LogFormat};
use inventory_store::utils::error::ErrorSeverity;
use inventory_store::utils::{logger, validation::Validate};
use inventory_store::{CliConfig, ConsoleNotifier, HttpItemApi, Item, ItemId, ItemStore, StoreError};

fn print_item(item: &Item) {
    let marker = if item.is_low_stock() { "⚠️ " } else { "" };
    match serde_json::to_string(item) {
        Ok(json) => println!("{}{}", marker, json),
        Err(e) => tracing::warn!("Could not serialize item {}: {}", item.id, e),
    }
}

async fn run(config: &CliConfig) -> Result<(), StoreError> {
    let store_config = config.store_config()?;
    let api = HttpItemApi::from_config(&store_config)?;
    let store = ItemStore::new(api, ConsoleNotifier)
        .with_low_stock_threshold(store_config.low_stock_threshold());

    tracing::debug!("Using backend {}", store_config.base_url());

    match &config.command {
        Command::List { low_stock } => {
            store.fetch_items().await?;
            let snapshot = store.snapshot().await;
            for item in snapshot.items.iter().filter(|i| !*low_stock || i.is_low_stock()) {
                print_item(item);
            }
            println!(
                "📦 {} items ({} low stock)",
                snapshot.items.len(),
                snapshot.low_stock_items().count()
            );
        }
        Command::Add(form) => {
            let form = load_form(&form.fields, &form.files).await?;
            if let Some(item) = store.add_item(form).await? {
                print_item(&item);
            }
        }
        Command::Edit { id, form } => {
            let form = load_form(&form.fields, &form.files).await?;
            let id = ItemId::from(id.as_str());
            // 先載入清單，讓本地鏡像包含要修改的項目
            store.fetch_items().await?;
            if store.find(&id).await.is_none() {
                tracing::warn!("Item {} is not in the current listing", id);
            }
            if let Some(item) = store.edit_item(&id, form).await? {
                print_item(&item);
            }
        }
        Command::Delete { id } => {
            let id = ItemId::from(id.as_str());
            store.fetch_items().await?;
            store.delete_item(&id).await?;
            println!("📦 {} items remaining", store.len().await);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting inventory-store CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

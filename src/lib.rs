pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::{Endpoints, HttpItemApi};
pub use crate::adapters::notify::{ConsoleNotifier, MemoryNotifier, TracingNotifier};
pub use crate::config::toml_config::StoreConfig;
pub use crate::core::{state::ItemState, store::ItemStore};
pub use crate::domain::model::{Item, ItemForm, ItemId, Notification, NotificationLevel};
pub use crate::domain::ports::{ItemApi, Notifier};
pub use crate::utils::error::{Result, StoreError};

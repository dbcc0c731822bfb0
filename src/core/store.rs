use crate::core::state::{ItemAction, ItemState};
use crate::domain::model::{Item, ItemForm, ItemId, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::domain::ports::{ItemApi, Notifier};
use crate::utils::error::{Result, StoreError};
use tokio::sync::RwLock;

pub const FETCH_FAILED: &str = "Failed to fetch items.";
pub const ADD_SUCCEEDED: &str = "Item added successfully!";
pub const ADD_FAILED: &str = "Failed to add item.";
pub const EDIT_SUCCEEDED: &str = "Item updated successfully!";
pub const EDIT_FAILED: &str = "Failed to update item.";
pub const DELETE_SUCCEEDED: &str = "Item deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete item.";

/// Item store: keeps a local mirror of the backend's item list in sync with
/// add/edit/delete calls and reports every outcome through the notifier.
///
/// Every operation notifies exactly once and returns its error to the caller;
/// callers that only care about the notification may ignore the result.
/// The state lock is never held across a backend call, so concurrent
/// operations interleave and the last applied change wins.
pub struct ItemStore<A: ItemApi, N: Notifier> {
    api: A,
    notifier: N,
    low_stock_threshold: i64,
    state: RwLock<ItemState>,
}

impl<A: ItemApi, N: Notifier> ItemStore<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            state: RwLock::new(ItemState::new()),
        }
    }

    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    async fn dispatch(&self, action: ItemAction) {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        *state = current.apply(action);
    }

    fn report_failure(&self, operation: &str, error: &StoreError, fallback: &str) {
        tracing::error!("❌ {} failed: {}", operation, error);
        let message = error.backend_message().unwrap_or(fallback);
        self.notifier.notify_error(message);
    }

    /// 重新載入整份清單
    pub async fn fetch_items(&self) -> Result<usize> {
        self.dispatch(ItemAction::FetchStarted).await;
        tracing::debug!("Fetching items");

        match self.api.list_items().await {
            Ok(items) => {
                let items: Vec<Item> = items
                    .into_iter()
                    .map(|item| item.with_low_stock(self.low_stock_threshold))
                    .collect();
                let count = items.len();
                self.dispatch(ItemAction::FetchSucceeded(items)).await;
                tracing::info!("📦 Loaded {} items", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("❌ Fetch items failed: {}", e);
                self.dispatch(ItemAction::FetchFailed(e.to_string())).await;
                self.notifier.notify_error(FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// 新增項目；成功時將後端回傳的項目加到清單尾端
    pub async fn add_item(&self, form: ItemForm) -> Result<Option<Item>> {
        tracing::debug!("Adding item ({} form parts)", form.len());

        match self.api.create_item(form).await {
            Ok(Some(item)) => {
                let item = item.with_low_stock(self.low_stock_threshold);
                tracing::info!("➕ Added item {}", item.id);
                self.dispatch(ItemAction::Added(item.clone())).await;
                self.notifier.notify_success(ADD_SUCCEEDED);
                Ok(Some(item))
            }
            Ok(None) => {
                tracing::warn!("Add item response carried no item, local list unchanged");
                self.notifier.notify_success(ADD_SUCCEEDED);
                Ok(None)
            }
            Err(e) => {
                self.report_failure("Add item", &e, ADD_FAILED);
                Err(e)
            }
        }
    }

    /// 更新項目；本地清單找不到該 id 時只通知不修改
    pub async fn edit_item(&self, id: &ItemId, form: ItemForm) -> Result<Option<Item>> {
        tracing::debug!("Editing item {} ({} form parts)", id, form.len());

        match self.api.update_item(id, form).await {
            Ok(Some(updated)) => {
                let updated = updated.with_low_stock(self.low_stock_threshold);

                let present = self.state.read().await.find(id).is_some();
                if present {
                    tracing::info!("✏️ Updated item {}", id);
                } else {
                    tracing::debug!("Item {} not in local list, skipping local update", id);
                }
                // 以呼叫者給的 id 定位
                self.dispatch(ItemAction::Updated {
                    id: id.clone(),
                    item: updated.clone(),
                })
                .await;
                self.notifier.notify_success(EDIT_SUCCEEDED);
                Ok(Some(updated))
            }
            Ok(None) => {
                tracing::warn!("Edit item response carried no updatedItem, local list unchanged");
                self.notifier.notify_success(EDIT_SUCCEEDED);
                Ok(None)
            }
            Err(e) => {
                self.report_failure("Edit item", &e, EDIT_FAILED);
                Err(e)
            }
        }
    }

    pub async fn delete_item(&self, id: &ItemId) -> Result<()> {
        tracing::debug!("Deleting item {}", id);

        match self.api.delete_item(id).await {
            Ok(()) => {
                self.dispatch(ItemAction::Removed(id.clone())).await;
                tracing::info!("🗑️ Deleted item {}", id);
                self.notifier.notify_success(DELETE_SUCCEEDED);
                Ok(())
            }
            Err(e) => {
                // 刪除失敗一律使用固定訊息
                tracing::error!("❌ Delete item failed: {}", e);
                self.notifier.notify_error(DELETE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn snapshot(&self) -> ItemState {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items.clone()
    }

    pub async fn find(&self, id: &ItemId) -> Option<Item> {
        self.state.read().await.find(id).cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }
}

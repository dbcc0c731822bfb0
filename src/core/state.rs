use crate::domain::model::{Item, ItemId};

/// Local mirror of the server's item list.
#[derive(Debug, Clone, Default)]
pub struct ItemState {
    pub items: Vec<Item>,
    pub loading: bool,
    pub error: Option<String>,
}

/// State transitions. Items arrive with `low_stock` already derived.
#[derive(Debug, Clone)]
pub enum ItemAction {
    FetchStarted,
    FetchSucceeded(Vec<Item>),
    FetchFailed(String),
    Added(Item),
    Updated { id: ItemId, item: Item },
    Removed(ItemId),
}

impl ItemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reducer: consumes the current state and returns the next one.
    pub fn apply(mut self, action: ItemAction) -> Self {
        match action {
            ItemAction::FetchStarted => {
                self.loading = true;
            }
            ItemAction::FetchSucceeded(items) => {
                self.items = items;
                self.loading = false;
                self.error = None;
            }
            ItemAction::FetchFailed(error) => {
                // 保留舊資料，只記錄錯誤
                self.loading = false;
                self.error = Some(error);
            }
            ItemAction::Added(item) => {
                self.items.push(item);
            }
            ItemAction::Updated { id, item } => {
                // 只取代第一筆相符的；找不到就不動
                if let Some(slot) = self.items.iter_mut().find(|i| i.id == id) {
                    *slot = item;
                }
            }
            ItemAction::Removed(id) => {
                self.items.retain(|i| i.id != id);
            }
        }
        self
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn low_stock_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_low_stock())
    }
}

use crate::domain::model::{Item, ItemForm, ItemId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Backend transport for item CRUD.
///
/// `create_item` / `update_item` return `None` when the response body does not
/// carry an item; the store then leaves its local mirror untouched.
#[async_trait]
pub trait ItemApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>>;
    async fn create_item(&self, form: ItemForm) -> Result<Option<Item>>;
    async fn update_item(&self, id: &ItemId, form: ItemForm) -> Result<Option<Item>>;
    async fn delete_item(&self, id: &ItemId) -> Result<()>;
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

#[async_trait]
impl<A: ItemApi + ?Sized> ItemApi for Arc<A> {
    async fn list_items(&self) -> Result<Vec<Item>> {
        (**self).list_items().await
    }

    async fn create_item(&self, form: ItemForm) -> Result<Option<Item>> {
        (**self).create_item(form).await
    }

    async fn update_item(&self, id: &ItemId, form: ItemForm) -> Result<Option<Item>> {
        (**self).update_item(id, form).await
    }

    async fn delete_item(&self, id: &ItemId) -> Result<()> {
        (**self).delete_item(id).await
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify_success(&self, message: &str) {
        (**self).notify_success(message)
    }

    fn notify_error(&self, message: &str) {
        (**self).notify_error(message)
    }
}

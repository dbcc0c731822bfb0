use httpmock::prelude::*;
use inventory_store::core::store::{
    ADD_SUCCEEDED, DELETE_FAILED, DELETE_SUCCEEDED, EDIT_FAILED, EDIT_SUCCEEDED, FETCH_FAILED,
};
use inventory_store::{HttpItemApi, ItemForm, ItemId, ItemStore, MemoryNotifier, NotificationLevel};
use serde_json::json;
use std::sync::Arc;

fn store_for(server: &MockServer) -> (ItemStore<HttpItemApi, Arc<MemoryNotifier>>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let api = HttpItemApi::new(server.base_url()).unwrap();
    (ItemStore::new(api, notifier.clone()), notifier)
}

fn mock_listing(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/api/get");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"items": [
                {"_id": "a", "name": "Bolt", "stock": 40},
                {"_id": "b", "name": "Nut", "stock": 5},
                {"_id": "c", "name": "Washer", "stock": 12}
            ]}));
    })
}

fn ids(items: &[inventory_store::Item]) -> Vec<String> {
    items.iter().map(|i| i.id.to_string()).collect()
}

#[tokio::test]
async fn test_full_crud_flow() {
    let server = MockServer::start();
    let list_mock = mock_listing(&server);
    let add_mock = server.mock(|when, then| {
        when.method(POST).path("/api/add-item").body_contains("Gear");
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(json!({"_id": "d", "name": "Gear", "stock": 2}));
    });
    let edit_mock = server.mock(|when, then| {
        when.method(PUT).path("/api/items/a");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"updatedItem": {"_id": "a", "name": "Bolt", "stock": 1}}));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/c");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"message": "deleted"}));
    });

    let (store, notifier) = store_for(&server);

    assert_eq!(store.fetch_items().await.unwrap(), 3);
    assert_eq!(ids(&store.items().await), vec!["a", "b", "c"]);
    assert!(store.find(&ItemId::from("b")).await.unwrap().is_low_stock());

    store
        .add_item(ItemForm::new().text("name", "Gear").text("stock", "2"))
        .await
        .unwrap();
    store
        .edit_item(&ItemId::from("a"), ItemForm::new().text("stock", "1"))
        .await
        .unwrap();
    store.delete_item(&ItemId::from("c")).await.unwrap();

    list_mock.assert();
    add_mock.assert();
    edit_mock.assert();
    delete_mock.assert();

    let snapshot = store.snapshot().await;
    assert_eq!(ids(&snapshot.items), vec!["a", "b", "d"]);
    assert_eq!(snapshot.items[0].low_stock, Some(true));
    assert_eq!(snapshot.low_stock_items().count(), 3);
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());

    assert_eq!(
        notifier.successes(),
        vec![ADD_SUCCEEDED, EDIT_SUCCEEDED, DELETE_SUCCEEDED]
    );
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_recorded() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/get");
        then.status(500);
    });

    let (store, notifier) = store_for(&server);
    assert!(store.fetch_items().await.is_err());

    assert!(store.is_empty().await);
    assert!(!store.is_loading().await);
    assert!(store.last_error().await.is_some());
    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].message, FETCH_FAILED);
}

#[tokio::test]
async fn test_edit_and_delete_failures_notify_once() {
    let server = MockServer::start();
    mock_listing(&server);
    server.mock(|when, then| {
        when.method(PUT).path("/api/items/a");
        then.status(422)
            .header("Content-Type", "application/json")
            .json_body(json!({"error": "Stock must be a number"}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/api/items/b");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/api/a");
        then.status(500)
            .header("Content-Type", "application/json")
            .json_body(json!({"error": "ignored for deletes"}));
    });

    let (store, notifier) = store_for(&server);
    store.fetch_items().await.unwrap();
    let before = store.items().await;

    assert!(store.edit_item(&ItemId::from("a"), ItemForm::new()).await.is_err());
    assert!(store.edit_item(&ItemId::from("b"), ItemForm::new()).await.is_err());
    assert!(store.delete_item(&ItemId::from("a")).await.is_err());

    assert_eq!(store.items().await, before);
    assert_eq!(
        notifier.errors(),
        vec!["Stock must be a number", EDIT_FAILED, DELETE_FAILED]
    );
}

#[tokio::test]
async fn test_concurrent_operations_share_one_store() {
    let server = MockServer::start();
    mock_listing(&server);
    for id in ["a", "b"] {
        server.mock(|when, then| {
            when.method(DELETE).path(format!("/api/{}", id));
            then.status(204);
        });
    }

    let (store, notifier) = store_for(&server);
    let store = Arc::new(store);
    store.fetch_items().await.unwrap();

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|id| {
            let store = store.clone();
            tokio::spawn(async move { store.delete_item(&ItemId::from(id)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(ids(&store.items().await), vec!["c"]);
    assert_eq!(notifier.successes().len(), 2);
}

use todo_server::entities::todo_item::ItemStatus;
use todo_server::item::{ItemPatch, ItemService, NewItem};
use todo_server::list::{ListService, ListServiceError};
use todo_server::pagination::Page;

mod common;

#[tokio::test]
#[ignore = "requires Docker"]
async fn can_run_list_lifecycle_on_postgres() {
    let container = common::setup_container()
        .await
        .expect("Failed to start postgres container");
    let db = common::setup_postgres_db(&container)
        .await
        .expect("Failed to setup postgres db");
    let list_service = ListService::new(&db);
    let item_service = ItemService::new(&db);

    let list = list_service
        .create("Groceries".to_string(), None)
        .await
        .expect("Failed to create list");
    let item = item_service
        .create(
            list.id(),
            NewItem {
                title: "Milk".to_string(),
                description: None,
                due_at: None,
            },
        )
        .await
        .expect("Failed to create item");
    let completed = item_service
        .update(
            list.id(),
            item.id(),
            ItemPatch {
                complete: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update item");
    assert_eq!(completed.status(), ItemStatus::Completed);

    list_service.delete(list.id()).await.expect("Failed to delete list");

    assert!(matches!(
        list_service.get(list.id()).await,
        Err(ListServiceError::ListNotFound(_))
    ));
    let items = item_service.list(list.id(), Page::new(1, 10)).await.unwrap();
    assert!(items.is_empty());
}

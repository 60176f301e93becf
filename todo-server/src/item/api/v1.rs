use crate::entities::todo_item::ItemStatus;
use crate::item::{ItemPatch, ItemService, NewItem, TodoItem};
use crate::list::api::v1::Deleted;
use crate::pagination::Pagination;
use crate::web::AppState;
use crate::web::api::{ApiError, ApiPath, ApiQuery, ErrorResponse, ValidatedJson};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a todo item.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewTodoItem {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub description: Option<String>,
    /// Optional deadline, ISO-8601 with offset
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

impl From<NewTodoItem> for NewItem {
    fn from(item: NewTodoItem) -> Self {
        Self {
            title: item.title,
            description: item.description,
            due_at: item.due_at,
        }
    }
}

/// Request body for updating a todo item. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoItem {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// `true` marks the item completed, `false` reopens it
    #[serde(default)]
    pub complete: Option<bool>,
}

impl From<UpdateTodoItem> for ItemPatch {
    fn from(update: UpdateTodoItem) -> Self {
        Self {
            title: update.title,
            description: update.description,
            due_at: update.due_at,
            complete: update.complete,
        }
    }
}

/// JSON representation of a todo item for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoItemJson {
    pub id: u32,
    /// ID of the list owning the item
    pub todo_list_id: u32,
    pub title: String,
    pub description: Option<String>,
    pub status_code: ItemStatus,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoItem> for TodoItemJson {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id(),
            todo_list_id: item.todo_list_id(),
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            status_code: item.status(),
            due_at: item.due_at(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

/// Handler for GET /lists/{list_id}/items - Returns one page of a list's items.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/lists/{list_id}/items",
    params(("list_id" = u32, Path, description = "Todo list ID"), Pagination),
    responses(
        (status = 200, description = "Successfully retrieved todo items", body = [TodoItemJson]),
        (status = 422, description = "Invalid path or pagination parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn get_items_handler(
    State(state): State<AppState>,
    ApiPath(list_id): ApiPath<u32>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> Result<Json<Vec<TodoItemJson>>, ApiError> {
    let page = pagination.resolve(state.config.max_per_page);
    let txn = state.db.begin().await?;
    let items = ItemService::new(&txn).list(list_id, page).await?;
    txn.commit().await?;

    Ok(Json(items.into_iter().map(TodoItemJson::from).collect()))
}

/// Handler for POST /lists/{list_id}/items - Creates an item under a list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/lists/{list_id}/items",
    params(("list_id" = u32, Path, description = "Todo list ID")),
    request_body = NewTodoItem,
    responses(
        (status = 201, description = "Todo item created", body = TodoItemJson),
        (status = 404, description = "Todo list not found", body = ErrorResponse),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn create_item_handler(
    State(state): State<AppState>,
    ApiPath(list_id): ApiPath<u32>,
    ValidatedJson(payload): ValidatedJson<NewTodoItem>,
) -> Result<(StatusCode, Json<TodoItemJson>), ApiError> {
    let txn = state.db.begin().await?;
    let item = ItemService::new(&txn)
        .create(list_id, NewItem::from(payload))
        .await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TodoItemJson::from(item))))
}

/// Handler for GET /lists/{list_id}/items/{item_id} - Returns a single item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/lists/{list_id}/items/{item_id}",
    params(
        ("list_id" = u32, Path, description = "Todo list ID"),
        ("item_id" = u32, Path, description = "Todo item ID")
    ),
    responses(
        (status = 200, description = "Successfully retrieved todo item", body = TodoItemJson),
        (status = 404, description = "Todo item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn get_item_handler(
    State(state): State<AppState>,
    ApiPath((list_id, item_id)): ApiPath<(u32, u32)>,
) -> Result<Json<TodoItemJson>, ApiError> {
    let txn = state.db.begin().await?;
    let item = ItemService::new(&txn).get(list_id, item_id).await?;
    txn.commit().await?;

    Ok(Json(TodoItemJson::from(item)))
}

/// Handler for PUT /lists/{list_id}/items/{item_id} - Partially updates an item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/lists/{list_id}/items/{item_id}",
    params(
        ("list_id" = u32, Path, description = "Todo list ID"),
        ("item_id" = u32, Path, description = "Todo item ID")
    ),
    request_body = UpdateTodoItem,
    responses(
        (status = 200, description = "Todo item updated", body = TodoItemJson),
        (status = 404, description = "Todo item not found", body = ErrorResponse),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn update_item_handler(
    State(state): State<AppState>,
    ApiPath((list_id, item_id)): ApiPath<(u32, u32)>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoItem>,
) -> Result<Json<TodoItemJson>, ApiError> {
    let txn = state.db.begin().await?;
    let item = ItemService::new(&txn)
        .update(list_id, item_id, ItemPatch::from(payload))
        .await?;
    txn.commit().await?;

    Ok(Json(TodoItemJson::from(item)))
}

/// Handler for DELETE /lists/{list_id}/items/{item_id} - Deletes an item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/lists/{list_id}/items/{item_id}",
    params(
        ("list_id" = u32, Path, description = "Todo list ID"),
        ("item_id" = u32, Path, description = "Todo item ID")
    ),
    responses(
        (status = 200, description = "Todo item deleted", body = Deleted),
        (status = 404, description = "Todo item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn delete_item_handler(
    State(state): State<AppState>,
    ApiPath((list_id, item_id)): ApiPath<(u32, u32)>,
) -> Result<Json<Deleted>, ApiError> {
    let txn = state.db.begin().await?;
    ItemService::new(&txn).delete(list_id, item_id).await?;
    txn.commit().await?;

    Ok(Json(Deleted::default()))
}

/// Creates and returns the todo item router.
pub fn create_item_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/lists/{list_id}/items",
            get(get_items_handler).post(create_item_handler),
        )
        .route(
            "/lists/{list_id}/items/{item_id}",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_item_with_offset_due_date() {
        let item: NewTodoItem = serde_json::from_str(
            r#"{"title": "Milk", "due_at": "2025-09-01T10:00:00+09:00"}"#,
        )
        .unwrap();
        assert!(item.validate().is_ok());
        assert_eq!(
            item.due_at.unwrap().to_rfc3339(),
            "2025-09-01T01:00:00+00:00"
        );
    }

    #[test]
    fn cannot_parse_malformed_due_date() {
        let result = serde_json::from_str::<NewTodoItem>(
            r#"{"title": "Milk", "due_at": "not a date"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn can_leave_every_update_field_absent() {
        let update: UpdateTodoItem = serde_json::from_str("{}").unwrap();
        assert!(update.validate().is_ok());
        let patch = ItemPatch::from(update);
        assert!(patch.title.is_none());
        assert!(patch.complete.is_none());
    }

    #[test]
    fn cannot_accept_oversized_item_title() {
        let update = UpdateTodoItem {
            title: Some("t".repeat(101)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn can_serialize_status_code_as_string() {
        let now = Utc::now();
        let item = TodoItem::new(
            3,
            1,
            "Milk".to_string(),
            None,
            ItemStatus::Completed,
            None,
            now,
            now,
        );
        let json = serde_json::to_value(TodoItemJson::from(item)).unwrap();
        assert_eq!(json["status_code"], "COMPLETED");
        assert_eq!(json["todo_list_id"], 1);
        assert!(json["due_at"].is_null());
    }
}

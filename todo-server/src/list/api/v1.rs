use crate::list::{ListPatch, ListService, TodoList};
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

/// Request body for creating a todo list.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewTodoList {
    /// Todo list title
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// Todo list description
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a todo list. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoList {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateTodoList> for ListPatch {
    fn from(update: UpdateTodoList) -> Self {
        Self {
            title: update.title,
            description: update.description,
        }
    }
}

/// JSON representation of a todo list for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoListJson {
    /// Unique identifier for the list
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    /// When the list was created
    pub created_at: DateTime<Utc>,
    /// When the list was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<TodoList> for TodoListJson {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id(),
            title: list.title().to_string(),
            description: list.description().map(str::to_string),
            created_at: list.created_at(),
            updated_at: list.updated_at(),
        }
    }
}

/// Empty object returned by successful deletes.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct Deleted {}

/// Handler for GET /lists - Returns one page of todo lists.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/lists",
    params(Pagination),
    responses(
        (status = 200, description = "Successfully retrieved todo lists", body = [TodoListJson]),
        (status = 422, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo lists"
)]
pub async fn get_lists_handler(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> Result<Json<Vec<TodoListJson>>, ApiError> {
    let page = pagination.resolve(state.config.max_per_page);
    let txn = state.db.begin().await?;
    let lists = ListService::new(&txn).list(page).await?;
    txn.commit().await?;

    Ok(Json(lists.into_iter().map(TodoListJson::from).collect()))
}

/// Handler for POST /lists - Creates a todo list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/lists",
    request_body = NewTodoList,
    responses(
        (status = 201, description = "Todo list created", body = TodoListJson),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo lists"
)]
pub async fn create_list_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewTodoList>,
) -> Result<(StatusCode, Json<TodoListJson>), ApiError> {
    let txn = state.db.begin().await?;
    let list = ListService::new(&txn)
        .create(payload.title, payload.description)
        .await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TodoListJson::from(list))))
}

/// Handler for GET /lists/{list_id} - Returns a single todo list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/lists/{list_id}",
    params(("list_id" = u32, Path, description = "Todo list ID")),
    responses(
        (status = 200, description = "Successfully retrieved todo list", body = TodoListJson),
        (status = 404, description = "Todo list not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo lists"
)]
pub async fn get_list_handler(
    State(state): State<AppState>,
    ApiPath(list_id): ApiPath<u32>,
) -> Result<Json<TodoListJson>, ApiError> {
    let txn = state.db.begin().await?;
    let list = ListService::new(&txn).get(list_id).await?;
    txn.commit().await?;

    Ok(Json(TodoListJson::from(list)))
}

/// Handler for PUT /lists/{list_id} - Partially updates a todo list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/lists/{list_id}",
    params(("list_id" = u32, Path, description = "Todo list ID")),
    request_body = UpdateTodoList,
    responses(
        (status = 200, description = "Todo list updated", body = TodoListJson),
        (status = 404, description = "Todo list not found", body = ErrorResponse),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo lists"
)]
pub async fn update_list_handler(
    State(state): State<AppState>,
    ApiPath(list_id): ApiPath<u32>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoList>,
) -> Result<Json<TodoListJson>, ApiError> {
    let txn = state.db.begin().await?;
    let list = ListService::new(&txn)
        .update(list_id, ListPatch::from(payload))
        .await?;
    txn.commit().await?;

    Ok(Json(TodoListJson::from(list)))
}

/// Handler for DELETE /lists/{list_id} - Deletes a todo list and its items.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/lists/{list_id}",
    params(("list_id" = u32, Path, description = "Todo list ID")),
    responses(
        (status = 200, description = "Todo list deleted", body = Deleted),
        (status = 404, description = "Todo list not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo lists"
)]
pub async fn delete_list_handler(
    State(state): State<AppState>,
    ApiPath(list_id): ApiPath<u32>,
) -> Result<Json<Deleted>, ApiError> {
    let txn = state.db.begin().await?;
    ListService::new(&txn).delete(list_id).await?;
    txn.commit().await?;

    Ok(Json(Deleted::default()))
}

/// Creates and returns the todo list router.
pub fn create_list_router(state: AppState) -> Router {
    Router::new()
        .route("/lists", get(get_lists_handler).post(create_list_handler))
        .route(
            "/lists/{list_id}",
            get(get_list_handler)
                .put(update_list_handler)
                .delete(delete_list_handler),
        )
        .with_state(state)
}

use crate::entities::todo_item::ItemStatus;
use crate::entities::*;
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct TodoItem {
    id: u32,
    todo_list_id: u32,
    title: String,
    description: Option<String>,
    status: ItemStatus,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TodoItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        todo_list_id: u32,
        title: String,
        description: Option<String>,
        status: ItemStatus,
        due_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            todo_list_id,
            title,
            description,
            status,
            due_at,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the item.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the ID of the list owning this item.
    pub fn todo_list_id(&self) -> u32 {
        self.todo_list_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<todo_item::Model> for TodoItem {
    fn from(model: todo_item::Model) -> Self {
        TodoItem::new(
            model.id as u32,
            model.todo_list_id as u32,
            model.title,
            model.description,
            model.status_code,
            model.due_at,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Fields for a new item. The status always starts as `NotCompleted`.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// Partial update of an item. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub complete: Option<bool>,
}

/// Error type for ItemService operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemServiceError {
    /// The parent list does not exist.
    #[error("Todo list with ID {0} not found")]
    ListNotFound(u32),
    /// No item with this ID exists under the given list.
    #[error("Todo item with ID {item_id} not found in list {list_id}")]
    ItemNotFound { list_id: u32, item_id: u32 },
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Data access for todo items. Every lookup is scoped to the owning list.
pub struct ItemService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ItemService<'a, C> {
    pub fn new(db: &'a C) -> Self {
        ItemService { db }
    }

    /// Retrieves an item by its ID, provided it belongs to `list_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, list_id: u32, item_id: u32) -> Result<TodoItem, ItemServiceError> {
        let model = self.find_model(list_id, item_id).await?;
        Ok(TodoItem::from(model))
    }

    /// Creates an item under an existing list.
    ///
    /// # Returns
    ///
    /// The stored `TodoItem`, or `ListNotFound` without writing anything when
    /// the parent list is missing.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, list_id: u32, new_item: NewItem) -> Result<TodoItem, ItemServiceError> {
        let Ok(db_list_id) = i32::try_from(list_id) else {
            return Err(ItemServiceError::ListNotFound(list_id));
        };
        if !self.list_exists(db_list_id).await? {
            return Err(ItemServiceError::ListNotFound(list_id));
        }

        let now = Utc::now();
        let active_model = todo_item::ActiveModel {
            todo_list_id: ActiveValue::Set(db_list_id),
            title: ActiveValue::Set(new_item.title),
            description: ActiveValue::Set(new_item.description),
            status_code: ActiveValue::Set(ItemStatus::NotCompleted),
            due_at: ActiveValue::Set(new_item.due_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(TodoItem::from(created_model))
    }

    /// Applies a partial update to an item. `complete` is the only way to
    /// change its status.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        list_id: u32,
        item_id: u32,
        patch: ItemPatch,
    ) -> Result<TodoItem, ItemServiceError> {
        let item_to_update = self.find_model(list_id, item_id).await?;

        let mut active_model: todo_item::ActiveModel = item_to_update.into();
        if let Some(title) = patch.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = patch.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(due_at) = patch.due_at {
            active_model.due_at = ActiveValue::Set(Some(due_at));
        }
        if let Some(complete) = patch.complete {
            active_model.status_code = ActiveValue::Set(ItemStatus::from_complete(complete));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        let updated_model = active_model.update(self.db).await?;

        Ok(TodoItem::from(updated_model))
    }

    /// Deletes an item, returning it as it was before removal.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, list_id: u32, item_id: u32) -> Result<TodoItem, ItemServiceError> {
        let item_to_delete = self.find_model(list_id, item_id).await?;
        let deleted = TodoItem::from(item_to_delete.clone());
        item_to_delete.delete(self.db).await?;
        Ok(deleted)
    }

    /// Retrieves one page of the items of a list, regardless of status.
    /// An unknown list simply has no items.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, list_id: u32, page: Page) -> Result<Vec<TodoItem>, ItemServiceError> {
        let Ok(db_list_id) = i32::try_from(list_id) else {
            return Ok(Vec::new());
        };
        let items = todo_item::Entity::find()
            .filter(todo_item::Column::TodoListId.eq(db_list_id))
            .order_by_asc(todo_item::Column::Id)
            .offset(page.offset())
            .limit(page.per_page())
            .all(self.db)
            .await?
            .into_iter()
            .map(TodoItem::from)
            .collect();
        Ok(items)
    }

    async fn find_model(
        &self,
        list_id: u32,
        item_id: u32,
    ) -> Result<todo_item::Model, ItemServiceError> {
        let (Ok(db_list_id), Ok(db_item_id)) = (i32::try_from(list_id), i32::try_from(item_id))
        else {
            return Err(ItemServiceError::ItemNotFound { list_id, item_id });
        };
        todo_item::Entity::find_by_id(db_item_id)
            .filter(todo_item::Column::TodoListId.eq(db_list_id))
            .one(self.db)
            .await?
            .ok_or(ItemServiceError::ItemNotFound { list_id, item_id })
    }

    async fn list_exists(&self, list_id: i32) -> Result<bool, ItemServiceError> {
        let list = todo_list::Entity::find_by_id(list_id)
            .one(self.db)
            .await?;
        Ok(list.is_some())
    }
}

use crate::entities::*;
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct TodoList {
    id: u32,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TodoList {
    pub fn new(
        id: u32,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the list.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<todo_list::Model> for TodoList {
    fn from(model: todo_list::Model) -> Self {
        TodoList::new(
            model.id as u32,
            model.title,
            model.description,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Partial update of a list. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct ListPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Error type for ListService operations.
#[derive(Debug, thiserror::Error)]
pub enum ListServiceError {
    /// Represents a list not found error.
    #[error("Todo list with ID {0} not found")]
    ListNotFound(u32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Data access for todo lists. Works on a pooled connection or on a
/// request-scoped transaction alike.
pub struct ListService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ListService<'a, C> {
    pub fn new(db: &'a C) -> Self {
        ListService { db }
    }

    /// Retrieves a list by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: u32) -> Result<TodoList, ListServiceError> {
        let model = self.find_model(id).await?;
        Ok(TodoList::from(model))
    }

    /// Creates a new list and returns it as stored, with its generated ID and timestamps.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        title: String,
        description: Option<String>,
    ) -> Result<TodoList, ListServiceError> {
        let now = Utc::now();
        let active_model = todo_list::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(TodoList::from(created_model))
    }

    /// Applies a partial update to a list. `updated_at` is refreshed even when
    /// the patch carries no fields.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: u32, patch: ListPatch) -> Result<TodoList, ListServiceError> {
        let list_to_update = self.find_model(id).await?;

        let mut active_model: todo_list::ActiveModel = list_to_update.into();
        if let Some(title) = patch.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = patch.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        let updated_model = active_model.update(self.db).await?;

        Ok(TodoList::from(updated_model))
    }

    /// Deletes a list together with all of its items.
    ///
    /// # Returns
    ///
    /// The deleted `TodoList`, or `ListNotFound` if no list has this ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: u32) -> Result<TodoList, ListServiceError> {
        let list_to_delete = self.find_model(id).await?;
        let deleted = TodoList::from(list_to_delete.clone());

        let removed_items = todo_item::Entity::delete_many()
            .filter(todo_item::Column::TodoListId.eq(list_to_delete.id))
            .exec(self.db)
            .await?;
        if removed_items.rows_affected > 0 {
            tracing::info!(
                "Removed {} items belonging to list {}",
                removed_items.rows_affected,
                id
            );
        }
        list_to_delete.delete(self.db).await?;

        Ok(deleted)
    }

    /// Retrieves one page of lists in ID order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, page: Page) -> Result<Vec<TodoList>, ListServiceError> {
        let lists = todo_list::Entity::find()
            .order_by_asc(todo_list::Column::Id)
            .offset(page.offset())
            .limit(page.per_page())
            .all(self.db)
            .await?
            .into_iter()
            .map(TodoList::from)
            .collect();
        Ok(lists)
    }

    async fn find_model(&self, id: u32) -> Result<todo_list::Model, ListServiceError> {
        // IDs beyond the column's range cannot exist.
        let Ok(db_id) = i32::try_from(id) else {
            return Err(ListServiceError::ListNotFound(id));
        };
        todo_list::Entity::find_by_id(db_id)
            .one(self.db)
            .await?
            .ok_or(ListServiceError::ListNotFound(id))
    }
}

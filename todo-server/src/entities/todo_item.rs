use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Completion state of a todo item, stored and serialized as
/// `NOT_COMPLETED` / `COMPLETED`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    #[sea_orm(string_value = "NOT_COMPLETED")]
    NotCompleted,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl ItemStatus {
    /// Maps the `complete` flag of an update request onto a status.
    pub fn from_complete(complete: bool) -> Self {
        if complete {
            ItemStatus::Completed
        } else {
            ItemStatus::NotCompleted
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todo_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub todo_list_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status_code: ItemStatus,
    pub due_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::todo_list::Entity",
        from = "Column::TodoListId",
        to = "super::todo_list::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TodoList,
}

impl Related<super::todo_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoList.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_map_complete_flag_to_status() {
        assert_eq!(ItemStatus::from_complete(true), ItemStatus::Completed);
        assert_eq!(ItemStatus::from_complete(false), ItemStatus::NotCompleted);
    }

    #[test]
    fn can_serialize_status_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ItemStatus::NotCompleted).unwrap(),
            "\"NOT_COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&ItemStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn can_store_status_as_string_value() {
        assert_eq!(ItemStatus::Completed.to_value(), "COMPLETED".to_string());
        assert_eq!(
            ItemStatus::try_from_value(&"NOT_COMPLETED".to_string()).unwrap(),
            ItemStatus::NotCompleted
        );
    }
}

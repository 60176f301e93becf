use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

use crate::m20250901_000001_create_todo_lists_table::TodoLists;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_TODO_ITEMS_TO_TODO_LISTS: &str = "fk-todo_items-todo_list_id";
const IDX_TODO_ITEMS_TODO_LIST_ID: &str = "idx-todo_items-todo_list_id";
const NOT_COMPLETED: &str = "NOT_COMPLETED";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoItems::Table)
                    .if_not_exists()
                    .col(pk_auto(TodoItems::Id))
                    .col(integer(TodoItems::TodoListId))
                    .col(string_len(TodoItems::Title, 100))
                    .col(string_len_null(TodoItems::Description, 200))
                    .col(string_len(TodoItems::StatusCode, 16).default(NOT_COMPLETED))
                    .col(timestamp_with_time_zone_null(TodoItems::DueAt))
                    .col(timestamp_with_time_zone(TodoItems::CreatedAt))
                    .col(timestamp_with_time_zone(TodoItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TODO_ITEMS_TO_TODO_LISTS)
                            .from(TodoItems::Table, TodoItems::TodoListId)
                            .to(TodoLists::Table, TodoLists::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TODO_ITEMS_TODO_LIST_ID)
                    .table(TodoItems::Table)
                    .col(TodoItems::TodoListId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TODO_ITEMS_TODO_LIST_ID)
                    .table(TodoItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(TodoItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TodoItems {
    Table,
    Id,
    TodoListId,
    Title,
    Description,
    StatusCode,
    DueAt,
    CreatedAt,
    UpdatedAt,
}

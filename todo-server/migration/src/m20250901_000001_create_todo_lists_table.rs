use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoLists::Table)
                    .if_not_exists()
                    .col(pk_auto(TodoLists::Id))
                    .col(string_len(TodoLists::Title, 100))
                    .col(string_len_null(TodoLists::Description, 200))
                    .col(timestamp_with_time_zone(TodoLists::CreatedAt))
                    .col(timestamp_with_time_zone(TodoLists::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoLists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum TodoLists {
    Table,
    Id,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
}

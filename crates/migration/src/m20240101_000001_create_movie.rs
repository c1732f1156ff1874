//! Create `movie` table.
//!
//! `id` is assigned by the database; `created_at`/`updated_at` are store-internal.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(text(Movie::Title).not_null())
                    .col(text(Movie::Director).not_null())
                    .col(integer(Movie::Year).not_null())
                    .col(timestamp_with_time_zone(Movie::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Movie::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Movie { Table, Id, Title, Director, Year, CreatedAt, UpdatedAt }

use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_movie::Movie;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Movie: (title, director, year) may appear at most once
        manager
            .create_index(
                Index::create()
                    .name("uniq_movie_title_director_year")
                    .table(Movie::Table)
                    .col(Movie::Title)
                    .col(Movie::Director)
                    .col(Movie::Year)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_movie_title_director_year")
                    .table(Movie::Table)
                    .to_owned(),
            )
            .await
    }
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(pk_uuid(Visitors::Id))
                    // Unique so concurrent captures of one phone converge on a single row
                    .col(string_len_uniq(Visitors::Phone, 50))
                    .col(string_len(Visitors::FullName, 200))
                    .col(string_null(Visitors::Email))
                    .col(string_len_null(Visitors::Organization, 200))
                    .col(string_len_null(Visitors::Designation, 200))
                    .col(string_len_null(Visitors::City, 100))
                    .col(string_len_null(Visitors::Country, 100))
                    .col(string_len_null(Visitors::Interests, 10))
                    .col(timestamp_with_time_zone(Visitors::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Visitors::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visitors_created_at")
                    .table(Visitors::Table)
                    .col(Visitors::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Visitors {
    Table,
    Id,
    Phone,
    FullName,
    Email,
    Organization,
    Designation,
    City,
    Country,
    Interests,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(pk_uuid(Companies::Id))
                    .col(string_len(Companies::Name, 200))
                    .col(string_len_uniq(Companies::CompanyCode, 20))
                    .col(string_null(Companies::ContactEmail))
                    .col(string_len_null(Companies::ContactPhone, 50))
                    .col(string_len(Companies::Status, 20).default("active"))
                    .col(timestamp_with_time_zone(Companies::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Companies::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_companies_status")
                    .table(Companies::Table)
                    .col(Companies::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Companies {
    Table,
    Id,
    Name,
    CompanyCode,
    ContactEmail,
    ContactPhone,
    Status,
    CreatedAt,
    UpdatedAt,
}

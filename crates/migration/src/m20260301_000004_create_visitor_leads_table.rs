use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260301_000001_create_companies_table::Companies,
    m20260301_000002_create_users_table::Users,
    m20260301_000003_create_visitors_table::Visitors,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitorLeads::Table)
                    .if_not_exists()
                    .col(pk_uuid(VisitorLeads::Id))
                    .col(uuid(VisitorLeads::CompanyId))
                    .col(uuid(VisitorLeads::VisitorId))
                    .col(uuid(VisitorLeads::EmployeeId))
                    .col(text_null(VisitorLeads::Notes))
                    .col(date_null(VisitorLeads::FollowUpDate))
                    .col(string_len_null(VisitorLeads::Organization, 200))
                    .col(string_len_null(VisitorLeads::Designation, 200))
                    .col(string_len_null(VisitorLeads::City, 100))
                    .col(string_len_null(VisitorLeads::Country, 100))
                    .col(string_len_null(VisitorLeads::Interests, 10))
                    .col(date(VisitorLeads::CaptureDate))
                    .col(timestamp_with_time_zone(VisitorLeads::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(VisitorLeads::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_leads_company_id")
                            .from(VisitorLeads::Table, VisitorLeads::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_leads_visitor_id")
                            .from(VisitorLeads::Table, VisitorLeads::VisitorId)
                            .to(Visitors::Table, Visitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_leads_employee_id")
                            .from(VisitorLeads::Table, VisitorLeads::EmployeeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One lead per visitor per company per calendar day
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visitor_leads_daily_unique")
                    .table(VisitorLeads::Table)
                    .col(VisitorLeads::VisitorId)
                    .col(VisitorLeads::CompanyId)
                    .col(VisitorLeads::CaptureDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_visitor_leads_company_id", VisitorLeads::CompanyId),
            ("idx_visitor_leads_employee_id", VisitorLeads::EmployeeId),
            ("idx_visitor_leads_created_at", VisitorLeads::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(VisitorLeads::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitorLeads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum VisitorLeads {
    Table,
    Id,
    CompanyId,
    VisitorId,
    EmployeeId,
    Notes,
    FollowUpDate,
    Organization,
    Designation,
    City,
    Country,
    Interests,
    CaptureDate,
    CreatedAt,
    UpdatedAt,
}

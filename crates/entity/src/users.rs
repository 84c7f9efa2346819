//! Users Entity
//!
//! Platform admins, company admins and employees. Soft-deleted through `is_active`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:            uuid::Uuid,
    #[sea_orm(unique)]
    pub email:         String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name:     String,
    pub phone:         Option<String>,
    pub role:          UserRole,
    pub company_id:    Option<uuid::Uuid>,
    pub is_active:     bool,
    pub created_at:    chrono::DateTime<chrono::Utc>,
    pub updated_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Company,
    #[sea_orm(has_many = "super::visitor_leads::Entity")]
    VisitorLeads,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl Related<super::visitor_leads::Entity> for Entity {
    fn to() -> RelationDef { Relation::VisitorLeads.def() }
}

impl ActiveModelBehavior for ActiveModel {}

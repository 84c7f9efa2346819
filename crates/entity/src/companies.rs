//! Companies Entity
//!
//! Exhibiting companies. Every company admin and employee belongs to exactly one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::CompanyStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:            uuid::Uuid,
    pub name:          String,
    #[sea_orm(unique)]
    pub company_code:  String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status:        CompanyStatus,
    pub created_at:    chrono::DateTime<chrono::Utc>,
    pub updated_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::visitor_leads::Entity")]
    VisitorLeads,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Users.def() }
}

impl Related<super::visitor_leads::Entity> for Entity {
    fn to() -> RelationDef { Relation::VisitorLeads.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool { self.status == CompanyStatus::Active }
}

//! Visitor Leads Entity
//!
//! A visitor captured by an employee on behalf of a company. At most one row per
//! (visitor, company, capture_date).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::Interest;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "visitor_leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:             uuid::Uuid,
    pub company_id:     uuid::Uuid,
    pub visitor_id:     uuid::Uuid,
    pub employee_id:    uuid::Uuid,
    pub notes:          Option<String>,
    pub follow_up_date: Option<chrono::NaiveDate>,
    pub organization:   Option<String>,
    pub designation:    Option<String>,
    pub city:           Option<String>,
    pub country:        Option<String>,
    pub interests:      Option<Interest>,
    pub capture_date:   chrono::NaiveDate,
    pub created_at:     chrono::DateTime<chrono::Utc>,
    pub updated_at:     chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::visitors::Entity",
        from = "Column::VisitorId",
        to = "super::visitors::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Visitor,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EmployeeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl Related<super::visitors::Entity> for Entity {
    fn to() -> RelationDef { Relation::Visitor.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employee.def() }
}

impl ActiveModelBehavior for ActiveModel {}

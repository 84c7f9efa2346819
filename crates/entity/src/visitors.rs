//! Visitors Entity
//!
//! People met at the expo. Global across companies and keyed by phone.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::Interest;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "visitors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:           uuid::Uuid,
    #[sea_orm(unique)]
    pub phone:        String,
    pub full_name:    String,
    pub email:        Option<String>,
    pub organization: Option<String>,
    pub designation:  Option<String>,
    pub city:         Option<String>,
    pub country:      Option<String>,
    pub interests:    Option<Interest>,
    pub created_at:   chrono::DateTime<chrono::Utc>,
    pub updated_at:   chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::visitor_leads::Entity")]
    VisitorLeads,
}

impl Related<super::visitor_leads::Entity> for Entity {
    fn to() -> RelationDef { Relation::VisitorLeads.def() }
}

impl ActiveModelBehavior for ActiveModel {}

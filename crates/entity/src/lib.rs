//! Entity definitions for Expo Leads
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! Column layout mirrors the migrations in the `migration` crate.

pub mod sea_orm_active_enums;

pub mod companies;
pub use companies::Entity as Companies;
pub mod users;
pub use users::Entity as Users;
pub mod visitors;
pub use visitors::Entity as Visitors;
pub mod visitor_leads;
pub use visitor_leads::Entity as VisitorLeads;

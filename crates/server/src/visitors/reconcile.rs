//! # Visitor Reconciliation
//!
//! A phone number identifies exactly one visitor across the whole platform. Lead capture and
//! visitor registration both go through here so concurrent callers converge on one row.

use chrono::Utc;
use entity::visitors;
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{dto::visitors::VisitorFields, utils::is_unique_violation};

/// Exact phone lookup.
pub async fn find_by_phone<C: ConnectionTrait>(db: &C, phone: &str) -> Result<Option<visitors::Model>> {
    Ok(visitors::Entity::find()
        .filter(visitors::Column::Phone.eq(phone))
        .one(db)
        .await?)
}

/// Insert a visitor. Omitted optional fields are stored as null.
///
/// The raw [`DbErr`] is returned so callers can tell a phone collision apart.
pub async fn insert_visitor<C: ConnectionTrait>(
    db: &C,
    phone: &str,
    full_name: &str,
    fields: &VisitorFields,
) -> std::result::Result<visitors::Model, DbErr> {
    let now = Utc::now();
    let visitor = visitors::ActiveModel {
        id:           Set(Uuid::new_v4()),
        phone:        Set(phone.to_string()),
        full_name:    Set(full_name.to_string()),
        email:        Set(fields.email.clone()),
        organization: Set(fields.organization.clone()),
        designation:  Set(fields.designation.clone()),
        city:         Set(fields.city.clone()),
        country:      Set(fields.country.clone()),
        interests:    Set(fields.interests),
        created_at:   Set(now),
        updated_at:   Set(now),
    };

    visitor.insert(db).await
}

/// Return the visitor owning `phone`, creating it when unknown.
///
/// An existing visitor is returned unchanged and the supplied details are ignored.
/// `full_name` is only required when a new row has to be written.
pub async fn find_or_create<C: ConnectionTrait>(
    db: &C,
    phone: &str,
    full_name: Option<&str>,
    fields: &VisitorFields,
) -> Result<visitors::Model> {
    let phone = phone.trim();
    if let Some(existing) = find_by_phone(db, phone).await? {
        debug!(visitor_id = %existing.id, "Visitor matched by phone");
        return Ok(existing);
    }

    let full_name = full_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::invalid_field("full_name", "Full name is required for new visitors"))?;

    match insert_visitor(db, phone, full_name, fields).await {
        Ok(visitor) => {
            info!(visitor_id = %visitor.id, "Visitor created");
            Ok(visitor)
        },
        Err(err) if is_unique_violation(&err) => {
            debug!("Concurrent visitor insert for the same phone, using the stored row");
            find_by_phone(db, phone)
                .await?
                .ok_or_else(|| AppError::from(err))
        },
        Err(err) => Err(err.into()),
    }
}

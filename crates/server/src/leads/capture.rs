//! # Lead Capture
//!
//! Resolves the visitor, enforces the one-lead-per-day rule and writes the lead with a
//! snapshot of the visitor's details.

use chrono::Utc;
use entity::{companies, sea_orm_active_enums::UserRole, visitor_leads, visitors};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::leads::{CreateLeadRequest, CreatedLead, UpdateLeadRequest},
    middleware::auth::AuthenticatedUser,
    utils::{is_unique_violation, non_blank, today},
    visitors::find_or_create,
};

/// Message returned when the daily lead already exists.
pub const DUPLICATE_LEAD_MESSAGE: &str = "Lead already exists for this visitor today";

/// The company a new lead belongs to.
///
/// Platform admins name it in the body; everyone else is bound to their own company.
pub async fn resolve_company(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
    requested: Option<Uuid>,
) -> Result<Uuid> {
    if !user.is(UserRole::PlatformAdmin) {
        return user.require_company();
    }

    let company_id =
        requested.ok_or_else(|| AppError::bad_request("Company ID required for platform admin"))?;
    companies::Entity::find_by_id(company_id)
        .one(db)
        .await?
        .map(|company| company.id)
        .ok_or_else(|| AppError::not_found("Company not found"))
}

async fn resolve_visitor(db: &DatabaseConnection, req: &CreateLeadRequest) -> Result<visitors::Model> {
    if let Some(visitor_id) = req.visitor_id {
        return visitors::Entity::find_by_id(visitor_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Visitor not found"));
    }

    let phone = non_blank(req.phone.clone());
    let full_name = non_blank(req.full_name.clone());
    match (phone, full_name) {
        (Some(phone), Some(full_name)) => find_or_create(db, &phone, Some(&full_name), &req.visitor).await,
        _ => {
            Err(AppError::bad_request(
                "Phone and full name are required when visitor_id is not provided",
            ))
        },
    }
}

/// Today's lead for the pair, if any.
pub async fn find_daily_lead(
    db: &DatabaseConnection,
    visitor_id: Uuid,
    company_id: Uuid,
) -> Result<Option<visitor_leads::Model>> {
    Ok(visitor_leads::Entity::find()
        .filter(visitor_leads::Column::VisitorId.eq(visitor_id))
        .filter(visitor_leads::Column::CompanyId.eq(company_id))
        .filter(visitor_leads::Column::CaptureDate.eq(today()))
        .one(db)
        .await?)
}

fn duplicate(existing: &visitor_leads::Model) -> AppError {
    AppError::conflict_with(DUPLICATE_LEAD_MESSAGE, "existing_lead_id", existing.id)
}

/// Capture a lead for `employee_id` under `company_id`.
pub async fn capture_lead(
    db: &DatabaseConnection,
    employee_id: Uuid,
    company_id: Uuid,
    req: CreateLeadRequest,
) -> Result<CreatedLead> {
    let visitor = resolve_visitor(db, &req).await?;

    if let Some(existing) = find_daily_lead(db, visitor.id, company_id).await? {
        return Err(duplicate(&existing));
    }

    let now = Utc::now();
    let fields = req.visitor;
    let lead = visitor_leads::ActiveModel {
        id:             Set(Uuid::new_v4()),
        company_id:     Set(company_id),
        visitor_id:     Set(visitor.id),
        employee_id:    Set(employee_id),
        notes:          Set(non_blank(req.notes)),
        follow_up_date: Set(req.follow_up_date),
        organization:   Set(visitor.organization.clone().or(fields.organization)),
        designation:    Set(visitor.designation.clone().or(fields.designation)),
        city:           Set(visitor.city.clone().or(fields.city)),
        country:        Set(visitor.country.clone().or(fields.country)),
        interests:      Set(visitor.interests.or(fields.interests)),
        capture_date:   Set(now.date_naive()),
        created_at:     Set(now),
        updated_at:     Set(now),
    };

    let lead = match lead.insert(db).await {
        Ok(lead) => lead,
        Err(err) if is_unique_violation(&err) => {
            let existing = find_daily_lead(db, visitor.id, company_id)
                .await?
                .ok_or_else(|| AppError::from(err))?;
            return Err(duplicate(&existing));
        },
        Err(err) => return Err(err.into()),
    };

    info!(
        lead_id = %lead.id,
        company_id = %company_id,
        employee_id = %employee_id,
        visitor_id = %visitor.id,
        "Lead created"
    );

    Ok(CreatedLead {
        lead,
        visitor: (&visitor).into(),
    })
}

/// Apply the writable fields of an update; ownership columns never change.
pub async fn apply_update(
    db: &DatabaseConnection,
    lead: visitor_leads::Model,
    req: UpdateLeadRequest,
) -> Result<visitor_leads::Model> {
    let mut active: visitor_leads::ActiveModel = lead.into();
    if let Some(interests) = req.interests {
        active.interests = Set(interests);
    }
    if let Some(notes) = req.notes {
        active.notes = Set(non_blank(notes));
    }
    if let Some(follow_up_date) = req.follow_up_date {
        active.follow_up_date = Set(follow_up_date);
    }
    active.updated_at = Set(Utc::now());

    let lead = active.update(db).await?;
    info!(lead_id = %lead.id, "Lead updated");
    Ok(lead)
}

#[cfg(test)]
mod tests {
    use entity::{sea_orm_active_enums::CompanyStatus, users};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, PaginatorTrait};

    use super::*;

    /// Database with one company and one of its employees.
    async fn seeded() -> (DatabaseConnection, Uuid, Uuid) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let now = Utc::now();

        let company = companies::ActiveModel {
            id:            Set(Uuid::new_v4()),
            name:          Set("Acme Expo".to_string()),
            company_code:  Set("ACME01".to_string()),
            contact_email: Set(None),
            contact_phone: Set(None),
            status:        Set(CompanyStatus::Active),
            created_at:    Set(now),
            updated_at:    Set(now),
        }
        .insert(&db)
        .await
        .unwrap();
        let employee = users::ActiveModel {
            id:            Set(Uuid::new_v4()),
            email:         Set("ravi@acme.test".to_string()),
            password_hash: Set("unused".to_string()),
            full_name:     Set("Ravi".to_string()),
            phone:         Set(None),
            role:          Set(UserRole::Employee),
            company_id:    Set(Some(company.id)),
            is_active:     Set(true),
            created_at:    Set(now),
            updated_at:    Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        (db, company.id, employee.id)
    }

    fn request(phone: &str, full_name: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            phone: Some(phone.to_string()),
            full_name: Some(full_name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_repeat_capture_points_at_existing_lead() {
        let (db, company_id, employee_id) = seeded().await;
        let created = capture_lead(&db, employee_id, company_id, request("9998887771", "Asha Rao"))
            .await
            .unwrap();
        let err = capture_lead(&db, employee_id, company_id, request("9998887771", "Asha Rao"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        match err {
            AppError::Conflict {
                existing: Some(existing),
                ..
            } => {
                assert_eq!(existing.field, "existing_lead_id");
                assert_eq!(existing.id, created.lead.id.to_string());
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_captures_keep_one_lead() {
        let (db, company_id, employee_id) = seeded().await;
        let (first, second) = tokio::join!(
            capture_lead(&db, employee_id, company_id, request("9998887771", "Asha Rao")),
            capture_lead(&db, employee_id, company_id, request("9998887771", "Asha Rao")),
        );

        let err = match (first, second) {
            (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
            _ => panic!("expected exactly one lead and one conflict"),
        };
        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        assert_eq!(visitor_leads::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(visitors::Entity::find().count(&db).await.unwrap(), 1);
    }
}

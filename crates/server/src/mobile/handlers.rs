//! # Mobile Handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use entity::{companies, sea_orm_active_enums::UserRole, visitor_leads, visitors};
use error::{ApiResponse, AppError, PaginationMeta, Result};
use logging::log_auth_event;
use sea_orm::{
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    accounts::{create_account, NewAccount},
    auth::handlers::{authenticate, issue_token},
    dto::{
        auth::{LoginRequest, LoginResponse},
        leads::{CreateLeadRequest, CreatedLead, LeadRow, UpdateLeadRequest},
        mobile::{
            MobileLeadListQuery,
            MobileRegisterRequest,
            PhoneSuggestions,
            VisitorExistsResponse,
            VisitorLookupQuery,
            MOBILE_PAGE_SIZE,
        },
        visitors::{VisitorSearchResponse, VisitorWithVisits},
    },
    extract::{AppJson, AppPath, AppQuery},
    leads::{
        capture::{apply_update, capture_lead},
        query::lead_rows,
    },
    middleware::auth::AuthenticatedUser,
    scope::AccessScope,
    utils::{contains_ci, starts_with},
    visitors::reconcile::find_by_phone,
    AppState,
};

/// Results returned by the visitor search.
pub const VISITOR_SEARCH_LIMIT: u64 = 20;
/// Completions returned for a phone prefix.
pub const SUGGESTION_LIMIT: u64 = 10;

const INACTIVE_COMPANY: &str = "Company is inactive. Please contact your administrator.";

/// `POST /api/mobile/login`
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>> {
    req.validate()?;
    let (user, company) = authenticate(&state, &req).await?;

    if user.role != UserRole::Employee {
        log_auth_event!("mobile_login", user.id, false);
        return Err(AppError::forbidden("Mobile access restricted to employees only"));
    }
    if !company.as_ref().is_some_and(companies::Model::is_active) {
        log_auth_event!("mobile_login", user.id, false);
        return Err(AppError::unauthorized(INACTIVE_COMPANY));
    }

    Ok(ApiResponse::ok(issue_token(&state, user, company.as_ref())?))
}

/// `POST /api/mobile/register`
///
/// Employee self-registration against an active company's code.
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<MobileRegisterRequest>,
) -> Result<(StatusCode, ApiResponse<LoginResponse>)> {
    if !state.settings.mobile_self_registration {
        return Err(AppError::forbidden("Self-registration is disabled"));
    }
    req.validate()?;

    let company = companies::Entity::find()
        .filter(companies::Column::CompanyCode.eq(req.company_code.trim()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid company code"))?;
    if !company.is_active() {
        return Err(AppError::bad_request(INACTIVE_COMPANY));
    }

    let user = create_account(
        &state.db,
        NewAccount {
            email:      req.email,
            password:   req.password,
            full_name:  req.full_name,
            phone:      req.phone,
            role:       UserRole::Employee,
            company_id: Some(company.id),
        },
    )
    .await?;

    log_auth_event!("mobile_register", user.id, true);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(issue_token(&state, user, Some(&company))?),
    ))
}

/// `POST /api/mobile/leads`
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateLeadRequest>,
) -> Result<(StatusCode, ApiResponse<CreatedLead>)> {
    req.validate()?;
    let company_id = user.require_company()?;
    let created = capture_lead(&state.db, user.id, company_id, req).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

/// `GET /api/mobile/leads`
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<MobileLeadListQuery>,
) -> Result<ApiResponse<Vec<LeadRow>>> {
    let scope = AccessScope::for_user(&user, None)?;
    let mut select = lead_rows().filter(scope.lead_condition());
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(contains_ci(visitors::Column::FullName, term))
                .add(contains_ci(visitors::Column::Phone, term))
                .add(contains_ci(visitor_leads::Column::Organization, term)),
        );
    }

    let (page, limit) = (query.paging.page(), query.paging.limit_or(MOBILE_PAGE_SIZE));
    let paginator = select.into_model::<LeadRow>().paginate(&state.db, limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(ApiResponse::paginated(
        rows,
        PaginationMeta::new(page, limit, total),
    ))
}

/// `PUT /api/mobile/leads/{id}`
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateLeadRequest>,
) -> Result<ApiResponse<visitor_leads::Model>> {
    let lead = visitor_leads::Entity::find_by_id(id)
        .filter(visitor_leads::Column::EmployeeId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found or access denied"))?;

    Ok(ApiResponse::ok(apply_update(&state.db, lead, req).await?))
}

/// `GET /api/mobile/visitors/search`
pub async fn search_visitors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VisitorLookupQuery>,
) -> Result<ApiResponse<VisitorSearchResponse>> {
    let phone = query.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let full_name = query.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if phone.is_none() && full_name.is_none() {
        return Err(AppError::bad_request("Phone or full name is required"));
    }

    let mut condition = Condition::all();
    if let Some(phone) = phone {
        condition = condition.add(contains_ci(visitors::Column::Phone, phone));
    }
    if let Some(full_name) = full_name {
        condition = condition.add(contains_ci(visitors::Column::FullName, full_name));
    }

    let visitors = visitors::Entity::find()
        .filter(condition)
        .order_by_desc(visitors::Column::CreatedAt)
        .limit(VISITOR_SEARCH_LIMIT)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(VisitorSearchResponse {
        count: visitors.len(),
        visitors,
    }))
}

/// `GET /api/mobile/visitors/exists/{phone}`
///
/// Visits are counted within the caller's company.
pub async fn visitor_exists(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(phone): AppPath<String>,
) -> Result<ApiResponse<VisitorExistsResponse>> {
    let Some(visitor) = find_by_phone(&state.db, phone.trim()).await?
    else {
        return Ok(ApiResponse::ok(VisitorExistsResponse {
            exists:  false,
            visitor: None,
        }));
    };

    let visits = visitor_leads::Entity::find()
        .filter(visitor_leads::Column::VisitorId.eq(visitor.id))
        .filter(visitor_leads::Column::CompanyId.eq(user.require_company()?));
    let total_visits = visits.clone().count(&state.db).await?;
    let last_visit = visits
        .order_by_desc(visitor_leads::Column::CreatedAt)
        .one(&state.db)
        .await?
        .map(|lead| lead.created_at);

    Ok(ApiResponse::ok(VisitorExistsResponse {
        exists:  true,
        visitor: Some(VisitorWithVisits {
            visitor,
            last_visit,
            total_visits,
        }),
    }))
}

/// Keep only the digits of a phone fragment.
pub fn digits_only(input: &str) -> String { input.chars().filter(char::is_ascii_digit).collect() }

/// `GET /api/mobile/visitors/phone-suggestions/{query}`
pub async fn phone_suggestions(
    State(state): State<AppState>,
    AppPath(query): AppPath<String>,
) -> Result<ApiResponse<PhoneSuggestions>> {
    let prefix = digits_only(&query);
    if prefix.is_empty() {
        return Ok(ApiResponse::ok(PhoneSuggestions {
            suggestions: Vec::new(),
        }));
    }

    let suggestions = visitors::Entity::find()
        .filter(starts_with(visitors::Column::Phone, &prefix))
        .order_by_asc(visitors::Column::Phone)
        .limit(SUGGESTION_LIMIT)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|v| format!("{} ({})", v.phone, v.full_name))
        .collect();

    Ok(ApiResponse::ok(PhoneSuggestions {
        suggestions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+91 (999) 888-77"), "9199988877");
        assert_eq!(digits_only("abc"), "");
    }
}

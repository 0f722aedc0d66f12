use std::str::FromStr;

use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::payroll::download_response;
use crate::auth::auth::AuthUser;
use crate::budget::changes::{CellEdit, CellKey, PendingChanges};
use crate::budget::rollup::{MONTHS, rollup};
use crate::budget::workflow::{BudgetAction, Denied, allowed_actions, check_action};
use crate::client::BackendClient;
use crate::config::Config;
use crate::error::AppError;
use crate::model::budget::{
    BudgetPlanDetail, BudgetVersion, BudgetVersionFilter, Category, CreateBudgetVersion, TransitionRequest,
};
use crate::utils::query_cache::{QueryCache, query_key};

const VERSIONS: &str = "budget/versions";
const CATEGORIES: &str = "budget/categories";

/// A budget version with the workflow actions open to the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BudgetVersionView {
    #[serde(flatten)]
    pub version: BudgetVersion,
    pub allowed_actions: Vec<BudgetAction>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RollupQuery {
    /// Mark up parent rows and totals by the configured risk premium
    #[serde(default)]
    pub risk_premium: bool,
}

fn version_key(version_id: u64) -> String {
    format!("{VERSIONS}/{version_id}")
}

fn details_key(version_id: u64) -> String {
    format!("{VERSIONS}/{version_id}/details")
}

/// List budget versions
#[utoipa::path(
    get,
    path = "/api/budget/versions",
    params(BudgetVersionFilter),
    responses((status = 200, description = "Budget versions", body = [BudgetVersion])),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn list_versions(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<BudgetVersionFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let versions: Vec<BudgetVersion> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(VERSIONS, &filter),
            client.list_budget_versions(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(versions))
}

/// Get a budget version and the caller's workflow actions
#[utoipa::path(
    get,
    path = "/api/budget/versions/{version_id}",
    params(("version_id" = u64, Path, description = "Budget version ID")),
    responses(
        (status = 200, description = "Budget version", body = BudgetVersionView),
        (status = 404, description = "Budget version not found")
    ),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn get_version(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();
    let version: BudgetVersion = cache
        .get_or_fetch(
            auth.user_id,
            version_key(version_id),
            client.get_budget_version(&auth.token, version_id),
        )
        .await?;

    let allowed_actions = allowed_actions(&version, &auth.actor());
    Ok(HttpResponse::Ok().json(BudgetVersionView {
        version,
        allowed_actions,
    }))
}

/// Create a budget version
#[utoipa::path(
    post,
    path = "/api/budget/versions",
    request_body = CreateBudgetVersion,
    responses(
        (status = 201, description = "Budget version created", body = BudgetVersion),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn create_version(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<CreateBudgetVersion>,
) -> Result<impl Responder, AppError> {
    if payload.version_name.trim().is_empty() {
        return Err(AppError::BadRequest("version_name must not be empty".to_string()));
    }

    let version = client.create_budget_version(&auth.token, &payload).await?;
    cache.invalidate(VERSIONS);

    tracing::info!(version_id = version.id, year = version.year, by = %auth.username, "Budget version created");
    Ok(HttpResponse::Created().json(version))
}

/// Delete a budget version
#[utoipa::path(
    delete,
    path = "/api/budget/versions/{version_id}",
    params(("version_id" = u64, Path, description = "Budget version ID")),
    responses(
        (status = 204, description = "Budget version deleted"),
        (status = 409, description = "Approved or rejected versions are kept")
    ),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn delete_version(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();

    let version = client.get_budget_version(&auth.token, version_id).await?;
    if version.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "A version in {} status cannot be deleted",
            version.status
        )));
    }

    client.delete_budget_version(&auth.token, version_id).await?;
    cache.invalidate(VERSIONS);

    tracing::info!(version_id, by = %auth.username, "Budget version deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Move a budget version through the approval workflow
#[utoipa::path(
    post,
    path = "/api/budget/versions/{version_id}/{action}",
    params(
        ("version_id" = u64, Path, description = "Budget version ID"),
        ("action" = String, Path, description = "submit | approve | reject | request-changes")
    ),
    request_body(content = TransitionRequest, description = "Optional reviewer comment"),
    responses(
        (status = 200, description = "Version after the transition", body = BudgetVersionView),
        (status = 403, description = "Role may not take this action"),
        (status = 404, description = "Unknown action or version"),
        (status = 409, description = "Action not allowed in the current status")
    ),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn transition(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<(u64, String)>,
    payload: Option<web::Json<TransitionRequest>>,
) -> Result<impl Responder, AppError> {
    let (version_id, segment) = path.into_inner();
    let action = BudgetAction::from_str(&segment)
        .map_err(|_| AppError::NotFound(format!("Unknown workflow action: {segment}")))?;

    // The cached copy may predate another user's transition.
    let version = client.get_budget_version(&auth.token, version_id).await?;
    let actor = auth.actor();

    check_action(&version, &actor, action).map_err(|denied| match denied {
        Denied::Role => AppError::Forbidden(format!("You may not {action} this budget version")),
        Denied::State { status } => {
            AppError::Conflict(format!("Cannot {action} a budget version in {status} status"))
        }
    })?;

    let body = TransitionRequest {
        comment: payload
            .and_then(|p| p.into_inner().comment)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
    };

    let updated = client
        .transition_budget_version(&auth.token, version_id, action, &body)
        .await?;
    cache.invalidate(VERSIONS);

    tracing::info!(
        version_id,
        %action,
        from = %version.status,
        to = %updated.status,
        by = %auth.username,
        "Budget version transition"
    );

    let allowed_actions = allowed_actions(&updated, &actor);
    Ok(HttpResponse::Ok().json(BudgetVersionView {
        version: updated,
        allowed_actions,
    }))
}

/// List budget categories
#[utoipa::path(
    get,
    path = "/api/budget/categories",
    responses((status = 200, description = "Category tree as a flat list", body = [Category])),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
) -> Result<impl Responder, AppError> {
    let categories: Vec<Category> = cache
        .get_or_fetch(auth.user_id, CATEGORIES.to_string(), client.list_categories(&auth.token))
        .await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// Plan cells of a budget version
#[utoipa::path(
    get,
    path = "/api/budget/versions/{version_id}/details",
    params(("version_id" = u64, Path, description = "Budget version ID")),
    responses((status = 200, description = "Plan details", body = [BudgetPlanDetail])),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn list_details(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();
    let details: Vec<BudgetPlanDetail> = cache
        .get_or_fetch(
            auth.user_id,
            details_key(version_id),
            client.list_plan_details(&auth.token, version_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(details))
}

/// Save edited plan cells in one batch
///
/// Cells are saved independently. The response lists cells that failed so the
/// client can resubmit just those; it is 207 when any cell failed.
#[utoipa::path(
    put,
    path = "/api/budget/versions/{version_id}/details",
    params(("version_id" = u64, Path, description = "Budget version ID")),
    request_body = [CellEdit],
    responses(
        (status = 200, description = "All cells saved", body = crate::budget::changes::SaveOutcome),
        (status = 207, description = "Some cells failed", body = crate::budget::changes::SaveOutcome),
        (status = 400, description = "Invalid cell"),
        (status = 409, description = "Version is not editable")
    ),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn save_details(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<Vec<CellEdit>>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();
    let edits = payload.into_inner();

    for edit in &edits {
        if !(1..=MONTHS as u32).contains(&edit.month) {
            return Err(AppError::BadRequest(format!("Invalid month {} for category {}", edit.month, edit.category_id)));
        }
        if !edit.planned_amount.is_finite() || edit.planned_amount < 0.0 {
            return Err(AppError::BadRequest(format!(
                "planned_amount must be a non-negative number (category {}, month {})",
                edit.category_id, edit.month
            )));
        }
    }

    let version = client.get_budget_version(&auth.token, version_id).await?;
    if !version.status.is_editable() {
        return Err(AppError::Conflict(format!(
            "Budget version in {} status cannot be edited",
            version.status
        )));
    }

    let loaded = client.list_plan_details(&auth.token, version_id).await?;
    let mut changes = PendingChanges::new(version_id, &loaded);
    for edit in &edits {
        let key = CellKey {
            category_id: edit.category_id,
            month: edit.month,
        };
        changes.set(key, edit.planned_amount);
    }

    let outcome = changes.save(&client, &auth.token).await;
    if outcome.saved > 0 {
        cache.invalidate(&version_key(version_id));
    }

    let status = if outcome.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok(HttpResponse::build(status).json(outcome))
}

/// Budget table with parent rows rolled up from leaf categories
#[utoipa::path(
    get,
    path = "/api/budget/versions/{version_id}/rollup",
    params(
        ("version_id" = u64, Path, description = "Budget version ID"),
        RollupQuery
    ),
    responses((status = 200, description = "Rolled-up budget table", body = crate::budget::rollup::BudgetRollup)),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn version_rollup(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<RollupQuery>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();

    let (categories, details): (Vec<Category>, Vec<BudgetPlanDetail>) = futures::try_join!(
        cache.get_or_fetch(auth.user_id, CATEGORIES.to_string(), client.list_categories(&auth.token)),
        cache.get_or_fetch(
            auth.user_id,
            details_key(version_id),
            client.list_plan_details(&auth.token, version_id)
        ),
    )?;

    let risk_premium = query.risk_premium.then_some(config.risk_premium_rate);
    Ok(HttpResponse::Ok().json(rollup(&categories, &details, risk_premium)))
}

/// Export a budget version to Excel
#[utoipa::path(
    get,
    path = "/api/budget/versions/{version_id}/export",
    params(("version_id" = u64, Path, description = "Budget version ID")),
    responses((status = 200, description = "Excel workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    tag = "Budget",
    security(("bearer_auth" = []))
)]
pub async fn export_version(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let version_id = path.into_inner();
    let download = client.export_budget_version(&auth.token, version_id).await?;
    Ok(download_response(download, &format!("budget_version_{version_id}.xlsx")))
}

//! Reference data used by the planning screens: revenue plans, contractors and users.

use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::client::BackendClient;
use crate::error::AppError;
use crate::model::directory::{Contractor, RevenuePlan, SaveRevenuePlan};
use crate::model::scenario::YearFilter;
use crate::model::user::User;
use crate::utils::query_cache::{QueryCache, query_key};

const REVENUE_PLANS: &str = "revenue/plans";

fn validate_revenue_plan(body: &SaveRevenuePlan) -> Result<(), AppError> {
    if !(1..=12).contains(&body.month) {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }
    if body.revenue_stream.trim().is_empty() {
        return Err(AppError::BadRequest("revenue_stream must not be empty".to_string()));
    }
    if body.planned_amount < 0.0 || body.actual_amount.is_some_and(|a| a < 0.0) {
        return Err(AppError::BadRequest("amounts must not be negative".to_string()));
    }
    Ok(())
}

/// List revenue plans
#[utoipa::path(
    get,
    path = "/api/revenue/plans",
    params(YearFilter),
    responses((status = 200, description = "Revenue plans", body = [RevenuePlan])),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn list_revenue_plans(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<YearFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let plans: Vec<RevenuePlan> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(REVENUE_PLANS, &filter),
            client.list_revenue_plans(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(plans))
}

/// Create revenue plan
#[utoipa::path(
    post,
    path = "/api/revenue/plans",
    request_body = SaveRevenuePlan,
    responses((status = 201, description = "Revenue plan created", body = RevenuePlan)),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn create_revenue_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<SaveRevenuePlan>,
) -> Result<impl Responder, AppError> {
    validate_revenue_plan(&payload)?;

    let plan = client.create_revenue_plan(&auth.token, &payload).await?;
    cache.invalidate(REVENUE_PLANS);

    Ok(HttpResponse::Created().json(plan))
}

/// Update revenue plan
#[utoipa::path(
    put,
    path = "/api/revenue/plans/{plan_id}",
    params(("plan_id" = u64, Path, description = "Revenue plan ID")),
    request_body = SaveRevenuePlan,
    responses((status = 200, description = "Revenue plan updated", body = RevenuePlan)),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn update_revenue_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<SaveRevenuePlan>,
) -> Result<impl Responder, AppError> {
    validate_revenue_plan(&payload)?;

    let plan = client
        .update_revenue_plan(&auth.token, path.into_inner(), &payload)
        .await?;
    cache.invalidate(REVENUE_PLANS);

    Ok(HttpResponse::Ok().json(plan))
}

/// Delete revenue plan
#[utoipa::path(
    delete,
    path = "/api/revenue/plans/{plan_id}",
    params(("plan_id" = u64, Path, description = "Revenue plan ID")),
    responses((status = 204, description = "Revenue plan deleted")),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn delete_revenue_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    client.delete_revenue_plan(&auth.token, path.into_inner()).await?;
    cache.invalidate(REVENUE_PLANS);

    Ok(HttpResponse::NoContent().finish())
}

/// List contractors
#[utoipa::path(
    get,
    path = "/api/contractors",
    responses((status = 200, description = "Contractors", body = [Contractor])),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn list_contractors(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
) -> Result<impl Responder, AppError> {
    let contractors: Vec<Contractor> = cache
        .get_or_fetch(auth.user_id, "contractors".to_string(), client.list_contractors(&auth.token))
        .await?;

    Ok(HttpResponse::Ok().json(contractors))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 403, description = "Admin only")
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let users: Vec<User> = cache
        .get_or_fetch(auth.user_id, "users".to_string(), client.list_users(&auth.token))
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

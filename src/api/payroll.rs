use actix_web::{HttpResponse, Responder, http::header, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::scenario::COMPARE_YEARS;
use crate::auth::auth::AuthUser;
use crate::client::{BackendClient, Download};
use crate::error::AppError;
use crate::model::payroll::{
    PayrollActual, PayrollFilter, PayrollImportResult, PayrollPlan, SavePayrollActual, SavePayrollPlan,
};
use crate::utils::query_cache::{QueryCache, query_key};

const PLANS: &str = "payroll/plans";
const ACTUALS: &str = "payroll/actuals";

/// Largest accepted Excel upload.
const MAX_IMPORT_BYTES: usize = 10 * 1024 * 1024;

/// Body limit for the import route; actix answers 413 above it.
pub fn import_payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(MAX_IMPORT_BYTES)
}

fn validate_period(year: i32, month: u32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(AppError::BadRequest("year is out of range".to_string()));
    }
    Ok(())
}

fn validate_plan(plan: &SavePayrollPlan) -> Result<(), AppError> {
    validate_period(plan.year, plan.month)?;
    if plan.base_salary < 0.0 || plan.monthly_bonus < 0.0 {
        return Err(AppError::BadRequest("amounts must not be negative".to_string()));
    }
    if let Some(part) = plan.fixed_part
        && !(0.0..=100.0).contains(&part)
    {
        return Err(AppError::BadRequest("fixed_part must be between 0 and 100".to_string()));
    }
    Ok(())
}

fn validate_actual(actual: &SavePayrollActual) -> Result<(), AppError> {
    validate_period(actual.year, actual.month)?;
    let amounts = [
        actual.base_salary_paid,
        actual.bonus_paid,
        actual.income_tax_amount,
        actual.social_tax_amount,
    ];
    if amounts.iter().any(|a| *a < 0.0) {
        return Err(AppError::BadRequest("amounts must not be negative".to_string()));
    }
    Ok(())
}

/// Streams a backend export to the browser unchanged.
pub(crate) fn download_response(download: Download, fallback_name: &str) -> HttpResponse {
    let disposition = download
        .content_disposition
        .unwrap_or_else(|| format!("attachment; filename=\"{fallback_name}\""));

    HttpResponse::Ok()
        .content_type(download.content_type)
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(download.bytes)
}

/// List payroll plans
#[utoipa::path(
    get,
    path = "/api/payroll/plans",
    params(PayrollFilter),
    responses((status = 200, description = "Payroll plans", body = [PayrollPlan])),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn list_plans(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<PayrollFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let plans: Vec<PayrollPlan> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(PLANS, &filter),
            client.list_payroll_plans(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(plans))
}

/// Create payroll plan
#[utoipa::path(
    post,
    path = "/api/payroll/plans",
    request_body = SavePayrollPlan,
    responses(
        (status = 201, description = "Payroll plan created", body = PayrollPlan),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn create_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<SavePayrollPlan>,
) -> Result<impl Responder, AppError> {
    validate_plan(&payload)?;

    let plan = client.create_payroll_plan(&auth.token, &payload).await?;
    cache.invalidate(PLANS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::Created().json(plan))
}

/// Update payroll plan
#[utoipa::path(
    put,
    path = "/api/payroll/plans/{plan_id}",
    params(("plan_id" = u64, Path, description = "Payroll plan ID")),
    request_body = SavePayrollPlan,
    responses(
        (status = 200, description = "Payroll plan updated", body = PayrollPlan),
        (status = 404, description = "Payroll plan not found")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn update_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<SavePayrollPlan>,
) -> Result<impl Responder, AppError> {
    validate_plan(&payload)?;
    let plan_id = path.into_inner();

    let plan = client
        .update_payroll_plan(&auth.token, plan_id, &payload)
        .await?;
    cache.invalidate(PLANS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::Ok().json(plan))
}

/// Delete payroll plan
#[utoipa::path(
    delete,
    path = "/api/payroll/plans/{plan_id}",
    params(("plan_id" = u64, Path, description = "Payroll plan ID")),
    responses((status = 204, description = "Payroll plan deleted")),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn delete_plan(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let plan_id = path.into_inner();
    client.delete_payroll_plan(&auth.token, plan_id).await?;
    cache.invalidate(PLANS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ImportQuery {
    /// Original file name of the uploaded workbook
    pub file_name: Option<String>,
}

/// Import payroll plans from an Excel workbook (raw request body)
#[utoipa::path(
    post,
    path = "/api/payroll/plans/import",
    params(ImportQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Import summary", body = PayrollImportResult),
        (status = 400, description = "Empty file"),
        (status = 413, description = "File larger than 10 MiB")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn import_plans(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<ImportQuery>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;

    if body.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let file_name = query
        .file_name
        .clone()
        .unwrap_or_else(|| "payroll_plans.xlsx".to_string());

    let result: PayrollImportResult = client
        .import_payroll_plans(&auth.token, &file_name, body.to_vec())
        .await?;
    cache.invalidate(PLANS);
    cache.invalidate(COMPARE_YEARS);

    tracing::info!(
        created = result.created,
        updated = result.updated,
        errors = result.errors.len(),
        by = %auth.username,
        "Payroll plans imported"
    );
    Ok(HttpResponse::Ok().json(result))
}

/// Export payroll plans to Excel
#[utoipa::path(
    get,
    path = "/api/payroll/plans/export",
    params(PayrollFilter),
    responses((status = 200, description = "Excel workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn export_plans(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    query: web::Query<PayrollFilter>,
) -> Result<impl Responder, AppError> {
    let download = client.export_payroll_plans(&auth.token, &query).await?;
    Ok(download_response(download, "payroll_plans.xlsx"))
}

/// List payroll actuals
#[utoipa::path(
    get,
    path = "/api/payroll/actuals",
    params(PayrollFilter),
    responses((status = 200, description = "Payroll actuals", body = [PayrollActual])),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn list_actuals(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<PayrollFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let actuals: Vec<PayrollActual> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(ACTUALS, &filter),
            client.list_payroll_actuals(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(actuals))
}

/// Record a payroll actual
#[utoipa::path(
    post,
    path = "/api/payroll/actuals",
    request_body = SavePayrollActual,
    responses(
        (status = 201, description = "Payroll actual created", body = PayrollActual),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn create_actual(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<SavePayrollActual>,
) -> Result<impl Responder, AppError> {
    validate_actual(&payload)?;

    let actual = client.create_payroll_actual(&auth.token, &payload).await?;
    cache.invalidate(ACTUALS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::Created().json(actual))
}

/// Update a payroll actual
#[utoipa::path(
    put,
    path = "/api/payroll/actuals/{actual_id}",
    params(("actual_id" = u64, Path, description = "Payroll actual ID")),
    request_body = SavePayrollActual,
    responses((status = 200, description = "Payroll actual updated", body = PayrollActual)),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn update_actual(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<SavePayrollActual>,
) -> Result<impl Responder, AppError> {
    validate_actual(&payload)?;
    let actual_id = path.into_inner();

    let actual = client
        .update_payroll_actual(&auth.token, actual_id, &payload)
        .await?;
    cache.invalidate(ACTUALS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::Ok().json(actual))
}

/// Delete a payroll actual
#[utoipa::path(
    delete,
    path = "/api/payroll/actuals/{actual_id}",
    params(("actual_id" = u64, Path, description = "Payroll actual ID")),
    responses((status = 204, description = "Payroll actual deleted")),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn delete_actual(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let actual_id = path.into_inner();
    client.delete_payroll_actual(&auth.token, actual_id).await?;
    cache.invalidate(ACTUALS);
    cache.invalidate(COMPARE_YEARS);

    Ok(HttpResponse::NoContent().finish())
}

/// Export payroll actuals to Excel
#[utoipa::path(
    get,
    path = "/api/payroll/actuals/export",
    params(PayrollFilter),
    responses((status = 200, description = "Excel workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn export_actuals(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    query: web::Query<PayrollFilter>,
) -> Result<impl Responder, AppError> {
    let download = client.export_payroll_actuals(&auth.token, &query).await?;
    Ok(download_response(download, "payroll_actuals.xlsx"))
}

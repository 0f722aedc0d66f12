use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::client::BackendClient;
use crate::error::AppError;
use crate::model::scenario::{
    CompareYearsQuery, CreateScenario, InsuranceRate, PayrollScenario, SaveInsuranceRate,
    YearComparison, YearFilter,
};
use crate::utils::query_cache::{QueryCache, query_key};

const RATES: &str = "insurance-rates";
const SCENARIOS: &str = "scenarios";
/// Year comparisons read payroll plans and actuals, so payroll writes drop them too.
pub(crate) const COMPARE_YEARS: &str = "scenarios/compare-years";

fn validate_rate(body: &SaveInsuranceRate) -> Result<(), AppError> {
    let mut rates = std::iter::once(body.rate).chain(body.rate_above_threshold);
    if rates.any(|r| !(0.0..=1.0).contains(&r)) {
        return Err(AppError::BadRequest("rate must be within [0, 1]".to_string()));
    }
    if body.threshold_amount.is_some_and(|t| t < 0.0) {
        return Err(AppError::BadRequest("threshold_amount must not be negative".to_string()));
    }
    Ok(())
}

/// List insurance rates
#[utoipa::path(
    get,
    path = "/api/scenarios/insurance-rates",
    params(YearFilter),
    responses((status = 200, description = "Insurance rates", body = [InsuranceRate])),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn list_insurance_rates(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<YearFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let rates: Vec<InsuranceRate> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(RATES, &filter),
            client.list_insurance_rates(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(rates))
}

/// Create insurance rate
#[utoipa::path(
    post,
    path = "/api/scenarios/insurance-rates",
    request_body = SaveInsuranceRate,
    responses(
        (status = 201, description = "Insurance rate created", body = InsuranceRate),
        (status = 403, description = "Admin/Accountant only")
    ),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn create_insurance_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<SaveInsuranceRate>,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;
    validate_rate(&payload)?;

    let rate = client.create_insurance_rate(&auth.token, &payload).await?;
    cache.invalidate(RATES);

    Ok(HttpResponse::Created().json(rate))
}

/// Update insurance rate
#[utoipa::path(
    put,
    path = "/api/scenarios/insurance-rates/{rate_id}",
    params(("rate_id" = u64, Path, description = "Insurance rate ID")),
    request_body = SaveInsuranceRate,
    responses((status = 200, description = "Insurance rate updated", body = InsuranceRate)),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn update_insurance_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<SaveInsuranceRate>,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;
    validate_rate(&payload)?;

    let rate = client
        .update_insurance_rate(&auth.token, path.into_inner(), &payload)
        .await?;
    cache.invalidate(RATES);

    Ok(HttpResponse::Ok().json(rate))
}

/// Delete insurance rate
#[utoipa::path(
    delete,
    path = "/api/scenarios/insurance-rates/{rate_id}",
    params(("rate_id" = u64, Path, description = "Insurance rate ID")),
    responses((status = 204, description = "Insurance rate deleted")),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn delete_insurance_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;

    client.delete_insurance_rate(&auth.token, path.into_inner()).await?;
    cache.invalidate(RATES);

    Ok(HttpResponse::NoContent().finish())
}

/// List payroll scenarios
#[utoipa::path(
    get,
    path = "/api/scenarios",
    responses((status = 200, description = "Scenarios", body = [PayrollScenario])),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn list_scenarios(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
) -> Result<impl Responder, AppError> {
    let scenarios: Vec<PayrollScenario> = cache
        .get_or_fetch(auth.user_id, SCENARIOS.to_string(), client.list_scenarios(&auth.token))
        .await?;

    Ok(HttpResponse::Ok().json(scenarios))
}

/// Get payroll scenario
#[utoipa::path(
    get,
    path = "/api/scenarios/{scenario_id}",
    params(("scenario_id" = u64, Path, description = "Scenario ID")),
    responses(
        (status = 200, description = "Scenario", body = PayrollScenario),
        (status = 404, description = "Scenario not found")
    ),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn get_scenario(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let scenario_id = path.into_inner();
    let scenario: PayrollScenario = cache
        .get_or_fetch(
            auth.user_id,
            format!("{SCENARIOS}/{scenario_id}"),
            client.get_scenario(&auth.token, scenario_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(scenario))
}

/// Create payroll scenario
#[utoipa::path(
    post,
    path = "/api/scenarios",
    request_body = CreateScenario,
    responses(
        (status = 201, description = "Scenario created", body = PayrollScenario),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn create_scenario(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<CreateScenario>,
) -> Result<impl Responder, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if payload.target_year < payload.base_year {
        return Err(AppError::BadRequest("target_year must not precede base_year".to_string()));
    }

    let scenario = client.create_scenario(&auth.token, &payload).await?;
    cache.invalidate(SCENARIOS);

    tracing::info!(scenario_id = scenario.id, by = %auth.username, "Scenario created");
    Ok(HttpResponse::Created().json(scenario))
}

/// Delete payroll scenario
#[utoipa::path(
    delete,
    path = "/api/scenarios/{scenario_id}",
    params(("scenario_id" = u64, Path, description = "Scenario ID")),
    responses((status = 204, description = "Scenario deleted")),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn delete_scenario(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    client.delete_scenario(&auth.token, path.into_inner()).await?;
    cache.invalidate(SCENARIOS);

    Ok(HttpResponse::NoContent().finish())
}

/// Run a scenario calculation on the backend
#[utoipa::path(
    post,
    path = "/api/scenarios/{scenario_id}/calculate",
    params(("scenario_id" = u64, Path, description = "Scenario ID")),
    responses((status = 200, description = "Scenario totals", body = crate::model::scenario::ScenarioResult)),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn calculate_scenario(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let result = client
        .calculate_scenario(&auth.token, path.into_inner())
        .await?;
    // the backend stores the totals on the scenario
    cache.invalidate(SCENARIOS);

    Ok(HttpResponse::Ok().json(result))
}

/// Compare payroll cost of two years
#[utoipa::path(
    get,
    path = "/api/scenarios/compare-years",
    params(CompareYearsQuery),
    responses((status = 200, description = "Year-over-year comparison", body = YearComparison)),
    tag = "Scenario",
    security(("bearer_auth" = []))
)]
pub async fn compare_years(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<CompareYearsQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    let comparison: YearComparison = cache
        .get_or_fetch(
            auth.user_id,
            query_key(COMPARE_YEARS, &query),
            client.compare_years(&auth.token, &query),
        )
        .await?;

    Ok(HttpResponse::Ok().json(comparison))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{backend_app_data, bearer};
    use crate::auth::middleware::auth_middleware;
    use crate::model::role::Role;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[actix_web::test]
    async fn rate_changes_need_finance_role() {
        let server = MockServer::start().await;
        let (client, cache, config) = backend_app_data(&server);
        let app = test::init_service(
            App::new()
                .app_data(config)
                .wrap(from_fn(auth_middleware))
                .app_data(client)
                .app_data(cache)
                .route("/insurance-rates", web::post().to(create_insurance_rate)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/insurance-rates")
            .insert_header(bearer(1, Role::Manager))
            .set_json(json!({
                "year": 2026, "rate_type": "PENSION", "rate": 0.22,
                "threshold_amount": null, "rate_above_threshold": null, "description": null
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::post()
            .uri("/insurance-rates")
            .insert_header(bearer(1, Role::Accountant))
            .set_json(json!({
                "year": 2026, "rate_type": "PENSION", "rate": 22.0,
                "threshold_amount": null, "rate_above_threshold": null, "description": null
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn compare_years_forwards_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payroll-scenarios/compare-years"))
            .and(query_param("base_year", "2025"))
            .and(query_param("target_year", "2026"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "base_year": 2025,
                "target_year": 2026,
                "base_total_cost": 1000000.0,
                "target_total_cost": 1100000.0,
                "difference": 100000.0,
                "difference_percent": 10.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, cache, config) = backend_app_data(&server);
        let app = test::init_service(
            App::new()
                .app_data(config)
                .wrap(from_fn(auth_middleware))
                .app_data(client)
                .app_data(cache)
                .route("/compare-years", web::get().to(compare_years)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/compare-years?base_year=2025&target_year=2026")
            .insert_header(bearer(1, Role::User))
            .to_request();
        let body: YearComparison = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.difference_percent, 10.0);
    }
}

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::calc::bonus::calculate_bonus;
use crate::calc::round_money;
use crate::calc::salary::{SalaryInput, salary_preview};
use crate::calc::tax::{FlatTaxPreview, employer_contributions, flat_tax_preview, ndfl_preview};
use crate::client::BackendClient;
use crate::config::Config;
use crate::error::AppError;
use crate::model::payroll::{BonusType, NdflRequest};

fn non_negative(name: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("{name} must be a non-negative number")))
    }
}

fn valid_rate(rate: f64) -> Result<(), AppError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(AppError::BadRequest("rate must be within [0, 1]".to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BonusInput {
    #[schema(example = 100000.0)]
    pub base: f64,
    /// KPI score, percent
    #[schema(example = 50.0)]
    pub kpi: f64,
    /// Depremiation threshold, percent
    #[schema(example = 10.0)]
    #[serde(default)]
    pub threshold: f64,
    pub bonus_type: BonusType,
    /// Guaranteed share of a MIXED bonus, percent
    #[schema(example = 50.0, nullable = true)]
    #[serde(default)]
    pub fixed_part: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BonusPreview {
    #[schema(example = 75000.0)]
    pub bonus: f64,
    /// True when the KPI fell below the threshold
    pub depremiated: bool,
}

/// Bonus payout preview
#[utoipa::path(
    post,
    path = "/api/payroll/preview/bonus",
    request_body = BonusInput,
    responses(
        (status = 200, description = "Bonus preview", body = BonusPreview),
        (status = 400, description = "Negative input")
    ),
    tag = "Preview",
    security(("bearer_auth" = []))
)]
pub async fn bonus(_auth: AuthUser, payload: web::Json<BonusInput>) -> Result<impl Responder, AppError> {
    non_negative("base", payload.base)?;
    non_negative("kpi", payload.kpi)?;
    non_negative("threshold", payload.threshold)?;

    let bonus = calculate_bonus(
        payload.base,
        payload.kpi,
        payload.threshold,
        payload.bonus_type,
        payload.fixed_part,
    );

    Ok(HttpResponse::Ok().json(BonusPreview {
        bonus: round_money(bonus),
        depremiated: payload.kpi < payload.threshold,
    }))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FlatTaxInput {
    #[schema(example = 180000.0)]
    pub gross: f64,
    #[schema(example = 0.13, nullable = true)]
    #[serde(default)]
    pub rate: Option<f64>,
}

/// Flat tax preview with the employer contribution breakdown
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FlatTaxResponse {
    #[serde(flatten)]
    pub preview: FlatTaxPreview,
    pub contributions: crate::calc::tax::EmployerContributions,
}

/// Flat income tax preview
#[utoipa::path(
    post,
    path = "/api/payroll/preview/flat-tax",
    request_body = FlatTaxInput,
    responses(
        (status = 200, description = "Net pay and employer tax", body = FlatTaxResponse),
        (status = 400, description = "Invalid input")
    ),
    tag = "Preview",
    security(("bearer_auth" = []))
)]
pub async fn flat_tax(
    _auth: AuthUser,
    config: web::Data<Config>,
    payload: web::Json<FlatTaxInput>,
) -> Result<impl Responder, AppError> {
    non_negative("gross", payload.gross)?;
    let rate = payload.rate.unwrap_or(config.default_ndfl_rate);
    valid_rate(rate)?;

    let preview = flat_tax_preview(payload.gross, rate);
    // tax is taken from the rounded figures so that net + tax == gross
    let gross = round_money(preview.gross);
    let net = round_money(preview.net);
    Ok(HttpResponse::Ok().json(FlatTaxResponse {
        contributions: employer_contributions(payload.gross),
        preview: FlatTaxPreview {
            gross,
            net,
            tax: round_money(gross - net),
            employer_social_tax: round_money(preview.employer_social_tax),
        },
    }))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NdflSource {
    /// Authoritative calculation by the backend
    #[default]
    Backend,
    /// Local rendition of the tax schedule
    Local,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NdflQuery {
    #[serde(default)]
    #[param(value_type = Option<String>, example = "backend")]
    pub source: NdflSource,
}

/// Progressive NDFL preview for one month
#[utoipa::path(
    post,
    path = "/api/payroll/preview/ndfl",
    params(NdflQuery),
    request_body = NdflRequest,
    responses(
        (status = 200, description = "Tax to withhold this month", body = crate::model::payroll::NdflResult),
        (status = 400, description = "Negative input")
    ),
    tag = "Preview",
    security(("bearer_auth" = []))
)]
pub async fn ndfl(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    query: web::Query<NdflQuery>,
    payload: web::Json<NdflRequest>,
) -> Result<impl Responder, AppError> {
    non_negative("current_month_income", payload.current_month_income)?;
    non_negative("ytd_income_before_month", payload.ytd_income_before_month)?;
    non_negative("ytd_tax_withheld", payload.ytd_tax_withheld)?;

    let result = match query.source {
        NdflSource::Backend => client.calculate_ndfl(&auth.token, &payload).await?,
        NdflSource::Local => ndfl_preview(&payload),
    };

    Ok(HttpResponse::Ok().json(result))
}

/// Monthly salary calculator
#[utoipa::path(
    post,
    path = "/api/payroll/preview/salary",
    request_body = SalaryInput,
    responses(
        (status = 200, description = "Gross, net and employer cost", body = crate::calc::salary::SalaryPreview),
        (status = 400, description = "Invalid input")
    ),
    tag = "Preview",
    security(("bearer_auth" = []))
)]
pub async fn salary(
    _auth: AuthUser,
    config: web::Data<Config>,
    payload: web::Json<SalaryInput>,
) -> Result<impl Responder, AppError> {
    non_negative("base_salary", payload.base_salary)?;
    non_negative("monthly_bonus", payload.monthly_bonus)?;
    let rate = payload.ndfl_rate.unwrap_or(config.default_ndfl_rate);
    valid_rate(rate)?;

    Ok(HttpResponse::Ok().json(salary_preview(payload.base_salary, payload.monthly_bonus, rate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{backend_app_data, bearer};
    use crate::model::payroll::NdflResult;
    use crate::auth::middleware::auth_middleware;
    use crate::model::role::Role;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    macro_rules! preview_app {
        ($server:expr) => {{
            let (client, cache, config) = backend_app_data($server);
            test::init_service(
                App::new()
                    .app_data(config)
                    .wrap(from_fn(auth_middleware))
                    .app_data(client)
                    .app_data(cache)
                    .route("/bonus", web::post().to(bonus))
                    .route("/flat-tax", web::post().to(flat_tax))
                    .route("/ndfl", web::post().to(ndfl))
                    .route("/salary", web::post().to(salary)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn bonus_preview_and_negative_input() {
        let server = MockServer::start().await;
        let app = preview_app!(&server);

        let req = test::TestRequest::post()
            .uri("/bonus")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({
                "base": 100000.0, "kpi": 50.0, "threshold": 10.0,
                "bonus_type": "MIXED", "fixed_part": 50.0
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["bonus"], 75000.0);
        assert_eq!(body["depremiated"], false);

        let req = test::TestRequest::post()
            .uri("/bonus")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({"base": -1.0, "kpi": 50.0, "bonus_type": "FIXED"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn flat_tax_uses_default_rate() {
        let server = MockServer::start().await;
        let app = preview_app!(&server);

        let req = test::TestRequest::post()
            .uri("/flat-tax")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({"gross": 100000.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["net"], 87000.0);
        assert_eq!(body["tax"], 13000.0);
        assert_eq!(body["employer_social_tax"], 30200.0);
        assert_eq!(body["contributions"]["total"], 30200.0);
    }

    #[actix_web::test]
    async fn flat_tax_parts_add_up_after_rounding() {
        let server = MockServer::start().await;
        let app = preview_app!(&server);

        // 0.875 and 0.125 both sit on a half kopeck
        let req = test::TestRequest::post()
            .uri("/flat-tax")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({"gross": 1.0, "rate": 0.125}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let gross = body["gross"].as_f64().unwrap();
        let net = body["net"].as_f64().unwrap();
        let tax = body["tax"].as_f64().unwrap();
        assert_eq!(gross, 1.0);
        assert!((net + tax - gross).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn ndfl_local_skips_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payroll/calculate-ndfl"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let app = preview_app!(&server);

        let req = test::TestRequest::post()
            .uri("/ndfl?source=local")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({
                "current_month_income": 100000.0,
                "ytd_income_before_month": 0.0,
                "ytd_tax_withheld": 0.0,
                "year": 2025
            }))
            .to_request();
        let body: NdflResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.tax_to_withhold, 13000.0);
        assert_eq!(body.system, "progressive_2025");
    }

    #[actix_web::test]
    async fn ndfl_defaults_to_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payroll/calculate-ndfl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tax_to_withhold": 28000.0,
                "monthly_effective_rate": 0.14,
                "system": "progressive_2025",
                "ytd_income_total": 2500000.0
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = preview_app!(&server);

        let req = test::TestRequest::post()
            .uri("/ndfl")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({
                "current_month_income": 200000.0,
                "ytd_income_before_month": 2300000.0,
                "ytd_tax_withheld": 299000.0,
                "year": 2025
            }))
            .to_request();
        let body: NdflResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.tax_to_withhold, 28000.0);
    }

    #[actix_web::test]
    async fn salary_rejects_rate_out_of_range() {
        let server = MockServer::start().await;
        let app = preview_app!(&server);

        let req = test::TestRequest::post()
            .uri("/salary")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({"base_salary": 100000.0, "ndfl_rate": 1.5}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }
}

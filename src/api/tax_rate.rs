use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::client::BackendClient;
use crate::error::AppError;
use crate::model::scenario::YearFilter;
use crate::model::tax_rate::{SaveTaxRate, TaxRate};
use crate::utils::query_cache::{QueryCache, query_key};

const RESOURCE: &str = "tax-rates";

fn validate(body: &SaveTaxRate) -> Result<(), AppError> {
    if body.tax_type.trim().is_empty() {
        return Err(AppError::BadRequest("tax_type must not be empty".to_string()));
    }
    let out_of_range = |r: f64| !(0.0..=1.0).contains(&r);
    if out_of_range(body.rate) || body.rate_above_threshold.is_some_and(out_of_range) {
        return Err(AppError::BadRequest("rate must be within [0, 1]".to_string()));
    }
    Ok(())
}

/// List tax rates
#[utoipa::path(
    get,
    path = "/api/tax-rates",
    params(YearFilter),
    responses((status = 200, description = "Tax rates", body = [TaxRate])),
    tag = "Tax rate",
    security(("bearer_auth" = []))
)]
pub async fn list_tax_rates(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<YearFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let rates: Vec<TaxRate> = cache
        .get_or_fetch(
            auth.user_id,
            query_key(RESOURCE, &filter),
            client.list_tax_rates(&auth.token, &filter),
        )
        .await?;

    Ok(HttpResponse::Ok().json(rates))
}

/// Create tax rate
#[utoipa::path(
    post,
    path = "/api/tax-rates",
    request_body = SaveTaxRate,
    responses(
        (status = 201, description = "Tax rate created", body = TaxRate),
        (status = 403, description = "Admin/Accountant only")
    ),
    tag = "Tax rate",
    security(("bearer_auth" = []))
)]
pub async fn create_tax_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<SaveTaxRate>,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;
    validate(&payload)?;

    let rate = client.create_tax_rate(&auth.token, &payload).await?;
    cache.invalidate(RESOURCE);

    Ok(HttpResponse::Created().json(rate))
}

/// Update tax rate
#[utoipa::path(
    put,
    path = "/api/tax-rates/{rate_id}",
    params(("rate_id" = u64, Path, description = "Tax rate ID")),
    request_body = SaveTaxRate,
    responses((status = 200, description = "Tax rate updated", body = TaxRate)),
    tag = "Tax rate",
    security(("bearer_auth" = []))
)]
pub async fn update_tax_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<SaveTaxRate>,
) -> Result<impl Responder, AppError> {
    auth.require_finance()?;
    validate(&payload)?;

    let rate = client
        .update_tax_rate(&auth.token, path.into_inner(), &payload)
        .await?;
    cache.invalidate(RESOURCE);

    Ok(HttpResponse::Ok().json(rate))
}

/// Delete tax rate
#[utoipa::path(
    delete,
    path = "/api/tax-rates/{rate_id}",
    params(("rate_id" = u64, Path, description = "Tax rate ID")),
    responses((status = 204, description = "Tax rate deleted")),
    tag = "Tax rate",
    security(("bearer_auth" = []))
)]
pub async fn delete_tax_rate(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    client.delete_tax_rate(&auth.token, path.into_inner()).await?;
    cache.invalidate(RESOURCE);

    Ok(HttpResponse::NoContent().finish())
}

/// Seed the default tax rate table
#[utoipa::path(
    post,
    path = "/api/tax-rates/initialize-default",
    responses(
        (status = 200, description = "Default rates created", body = crate::model::tax_rate::InitializeRatesResult),
        (status = 403, description = "Admin only")
    ),
    tag = "Tax rate",
    security(("bearer_auth" = []))
)]
pub async fn initialize_default(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let result = client.initialize_default_tax_rates(&auth.token).await?;
    cache.invalidate(RESOURCE);

    tracing::info!(created = result.created_count, by = %auth.username, "Default tax rates initialized");
    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{backend_app_data, bearer};
    use crate::model::tax_rate::InitializeRatesResult;
    use crate::auth::middleware::auth_middleware;
    use crate::model::role::Role;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[actix_web::test]
    async fn initialize_refreshes_cached_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tax-rates/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tax-rates/initialize-default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Default rates created",
                "created_count": 6
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
                .route("/tax-rates", web::get().to(list_tax_rates))
                .route("/tax-rates/initialize-default", web::post().to(initialize_default)),
        )
        .await;

        let list = || {
            test::TestRequest::get()
                .uri("/tax-rates")
                .insert_header(bearer(1, Role::Admin))
                .to_request()
        };
        assert_eq!(test::call_service(&app, list()).await.status(), 200);
        assert_eq!(test::call_service(&app, list()).await.status(), 200);

        let req = test::TestRequest::post()
            .uri("/tax-rates/initialize-default")
            .insert_header(bearer(1, Role::Accountant))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::post()
            .uri("/tax-rates/initialize-default")
            .insert_header(bearer(1, Role::Admin))
            .to_request();
        let body: InitializeRatesResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.created_count, 6);

        assert_eq!(test::call_service(&app, list()).await.status(), 200);
    }

    #[actix_web::test]
    async fn rates_are_fractions() {
        let mut body = SaveTaxRate {
            year: 2026,
            tax_type: "NDFL".to_string(),
            rate: 0.13,
            threshold_amount: Some(2_400_000.0),
            rate_above_threshold: Some(0.15),
            description: None,
        };
        assert!(validate(&body).is_ok());

        body.rate_above_threshold = Some(15.0);
        assert!(validate(&body).is_err());
    }
}

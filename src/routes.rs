use crate::{
    api::{budget, directory, employee, payroll, preview, scenario, tax_rate},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, middleware::from_fn, web};
use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    protected: Arc<Limiter>,
    preview: Arc<Limiter>,
}

impl Limiters {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            protected: Arc::new(build_limiter(config.rate_protected_per_min).context("protected rate limiter")?),
            preview: Arc::new(build_limiter(config.rate_preview_per_min).context("preview rate limiter")?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Option<Limiter> {
    let per_ms = (60_000 / requests_per_min.max(1) as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    // Public
    cfg.route("/health", web::get().to(health));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected.clone()) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    // /employees/{id}/salary-history
                    .service(
                        web::resource("/{id}/salary-history")
                            .route(web::get().to(employee::salary_history))
                            .route(web::post().to(employee::add_salary_change)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::scope("/preview")
                            .wrap(limiters.preview.clone())
                            .route("/bonus", web::post().to(preview::bonus))
                            .route("/flat-tax", web::post().to(preview::flat_tax))
                            .route("/ndfl", web::post().to(preview::ndfl))
                            .route("/salary", web::post().to(preview::salary)),
                    )
                    // static segments before /{id}
                    .service(
                        web::resource("/plans/import")
                            .app_data(payroll::import_payload_config())
                            .route(web::post().to(payroll::import_plans)),
                    )
                    .route("/plans/export", web::get().to(payroll::export_plans))
                    .route("/actuals/export", web::get().to(payroll::export_actuals))
                    .service(
                        web::resource("/plans")
                            .route(web::get().to(payroll::list_plans))
                            .route(web::post().to(payroll::create_plan)),
                    )
                    .service(
                        web::resource("/plans/{id}")
                            .route(web::put().to(payroll::update_plan))
                            .route(web::delete().to(payroll::delete_plan)),
                    )
                    .service(
                        web::resource("/actuals")
                            .route(web::get().to(payroll::list_actuals))
                            .route(web::post().to(payroll::create_actual)),
                    )
                    .service(
                        web::resource("/actuals/{id}")
                            .route(web::put().to(payroll::update_actual))
                            .route(web::delete().to(payroll::delete_actual)),
                    ),
            )
            .service(
                web::scope("/scenarios")
                    .service(
                        web::resource("/insurance-rates")
                            .route(web::get().to(scenario::list_insurance_rates))
                            .route(web::post().to(scenario::create_insurance_rate)),
                    )
                    .service(
                        web::resource("/insurance-rates/{id}")
                            .route(web::put().to(scenario::update_insurance_rate))
                            .route(web::delete().to(scenario::delete_insurance_rate)),
                    )
                    .route("/compare-years", web::get().to(scenario::compare_years))
                    .service(
                        web::resource("")
                            .route(web::get().to(scenario::list_scenarios))
                            .route(web::post().to(scenario::create_scenario)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(scenario::get_scenario))
                            .route(web::delete().to(scenario::delete_scenario)),
                    )
                    .route("/{id}/calculate", web::post().to(scenario::calculate_scenario)),
            )
            .service(
                web::scope("/tax-rates")
                    .route("/initialize-default", web::post().to(tax_rate::initialize_default))
                    .service(
                        web::resource("")
                            .route(web::get().to(tax_rate::list_tax_rates))
                            .route(web::post().to(tax_rate::create_tax_rate)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(tax_rate::update_tax_rate))
                            .route(web::delete().to(tax_rate::delete_tax_rate)),
                    ),
            )
            .service(
                web::scope("/budget")
                    .route("/categories", web::get().to(budget::list_categories))
                    .service(
                        web::resource("/versions")
                            .route(web::get().to(budget::list_versions))
                            .route(web::post().to(budget::create_version)),
                    )
                    .service(
                        web::resource("/versions/{id}")
                            .route(web::get().to(budget::get_version))
                            .route(web::delete().to(budget::delete_version)),
                    )
                    .route("/versions/{id}/rollup", web::get().to(budget::version_rollup))
                    .route("/versions/{id}/export", web::get().to(budget::export_version))
                    .service(
                        web::resource("/versions/{id}/details")
                            .route(web::get().to(budget::list_details))
                            .route(web::put().to(budget::save_details)),
                    )
                    // submit | approve | reject | request-changes
                    .route("/versions/{id}/{action}", web::post().to(budget::transition)),
            )
            .service(
                web::resource("/revenue/plans")
                    .route(web::get().to(directory::list_revenue_plans))
                    .route(web::post().to(directory::create_revenue_plan)),
            )
            .service(
                web::resource("/revenue/plans/{id}")
                    .route(web::put().to(directory::update_revenue_plan))
                    .route(web::delete().to(directory::delete_revenue_plan)),
            )
            .route("/contractors", web::get().to(directory::list_contractors))
            .route("/users", web::get().to(directory::list_users)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{backend_app_data, bearer};
    use crate::model::role::Role;
    use actix_web::{App, test};
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[actix_web::test]
    async fn routes_are_mounted_under_prefix_and_authenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payroll/plans/export"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"PK".to_vec(), "application/vnd.ms-excel"))
            .expect(1)
            .mount(&server)
            .await;

        let (client, cache, config) = backend_app_data(&server);
        let limiters = Limiters::new(&config).unwrap();
        let prefix_config = config.get_ref().clone();
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(client)
                .app_data(cache)
                .configure(|cfg| configure(cfg, &prefix_config, &limiters)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");

        let req = test::TestRequest::get()
            .uri("/api/payroll/plans/export")
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        // the static export segment wins over /plans/{id}
        let req = test::TestRequest::get()
            .uri("/api/payroll/plans/export")
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .insert_header(bearer(1, Role::User))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
}

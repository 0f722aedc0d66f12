use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::client::BackendClient;
use crate::error::AppError;
use crate::model::employee::{
    CreateEmployee, CreateSalaryChange, Employee, EmployeeFilter, SalaryHistory, UpdateEmployee,
};
use crate::utils::query_cache::{QueryCache, query_key};

pub(crate) const RESOURCE: &str = "employees";

fn validate_salary(amount: f64) -> Result<(), AppError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest("Salary must be a non-negative amount".to_string()))
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Employee list", body = [Employee]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    query: web::Query<EmployeeFilter>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner();
    let key = query_key(RESOURCE, &filter);

    let employees: Vec<Employee> = cache
        .get_or_fetch(auth.user_id, key, client.list_employees(&auth.token, &filter))
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get employee by id
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let employee_id = path.into_inner();

    let employee: Employee = cache
        .get_or_fetch(
            auth.user_id,
            format!("{RESOURCE}/{employee_id}"),
            client.get_employee(&auth.token, employee_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Create employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    payload: web::Json<CreateEmployee>,
) -> Result<impl Responder, AppError> {
    if payload.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("full_name must not be empty".to_string()));
    }
    validate_salary(payload.base_salary)?;

    let employee = client.create_employee(&auth.token, &payload).await?;
    cache.invalidate(RESOURCE);

    tracing::info!(employee_id = employee.id, by = %auth.username, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<impl Responder, AppError> {
    let employee_id = path.into_inner();
    if let Some(salary) = payload.base_salary {
        validate_salary(salary)?;
    }

    let employee = client
        .update_employee(&auth.token, employee_id, &payload)
        .await?;
    cache.invalidate(RESOURCE);

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    client.delete_employee(&auth.token, employee_id).await?;
    cache.invalidate(RESOURCE);

    tracing::info!(employee_id, by = %auth.username, "Employee deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Salary history of an employee
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/salary-history",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses((status = 200, description = "Salary changes", body = [SalaryHistory])),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn salary_history(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let employee_id = path.into_inner();

    let history: Vec<SalaryHistory> = cache
        .get_or_fetch(
            auth.user_id,
            format!("{RESOURCE}/{employee_id}/salary-history"),
            client.salary_history(&auth.token, employee_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(history))
}

/// Record a salary change
#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/salary-history",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    request_body = CreateSalaryChange,
    responses((status = 201, description = "Salary change recorded", body = SalaryHistory)),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn add_salary_change(
    auth: AuthUser,
    client: web::Data<BackendClient>,
    cache: web::Data<QueryCache>,
    path: web::Path<u64>,
    payload: web::Json<CreateSalaryChange>,
) -> Result<impl Responder, AppError> {
    validate_salary(payload.new_salary)?;
    let employee_id = path.into_inner();

    let change = client
        .add_salary_change(&auth.token, employee_id, &payload)
        .await?;
    // the employee's current salary changes too
    cache.invalidate(RESOURCE);

    Ok(HttpResponse::Created().json(change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{backend_app_data, bearer};
    use crate::auth::middleware::auth_middleware;
    use actix_web::middleware::from_fn;
    use crate::model::role::Role;
    use actix_web::{App, test};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn employee_json(id: u64, salary: f64) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": "Olga Ivanova",
            "position": "Economist",
            "department": "Planning",
            "base_salary": salary,
            "hire_date": "2023-04-01",
            "is_active": true
        })
    }

    #[actix_web::test]
    async fn list_is_cached_until_a_write() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([employee_json(1, 100000.0)])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/employees/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(employee_json(1, 120000.0)))
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
                .route("/employees", web::get().to(list_employees))
                .route("/employees/{id}", web::put().to(update_employee)),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/employees")
                .insert_header(bearer(1, Role::User))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 200);
        }

        let req = test::TestRequest::put()
            .uri("/employees/1")
            .insert_header(bearer(1, Role::User))
            .set_json(json!({"base_salary": 120000.0}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri("/employees")
            .insert_header(bearer(1, Role::User))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
        // wiremock verifies two list calls on drop
    }

    #[actix_web::test]
    async fn delete_requires_admin() {
        let server = MockServer::start().await;
        let (client, cache, config) = backend_app_data(&server);
        let app = test::init_service(
            App::new()
                .app_data(config)
                .wrap(from_fn(auth_middleware))
                .app_data(client)
                .app_data(cache)
                .route("/employees/{id}", web::delete().to(delete_employee)),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/employees/1")
            .insert_header(bearer(1, Role::Manager))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Admin only");
    }

    #[actix_web::test]
    async fn backend_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/employees"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Employee already exists"})),
            )
            .mount(&server)
            .await;

        let (client, cache, config) = backend_app_data(&server);
        let app = test::init_service(
            App::new()
                .app_data(config)
                .wrap(from_fn(auth_middleware))
                .app_data(client)
                .app_data(cache)
                .route("/employees", web::post().to(create_employee)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees")
            .insert_header(bearer(1, Role::Admin))
            .set_json(json!({
                "full_name": "Olga Ivanova",
                "position": "Economist",
                "department": null,
                "base_salary": 90000.0,
                "hire_date": null
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Employee already exists");
    }

    #[actix_web::test]
    async fn cached_entity_is_not_served_to_another_user() {
        let server = MockServer::start().await;
        let admin = bearer(1, Role::Admin);
        let user = bearer(2, Role::User);
        Mock::given(method("GET"))
            .and(path("/employees/5"))
            .and(header("Authorization", admin.1.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(employee_json(5, 900000.0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/employees/5"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"detail": "Not enough permissions"})),
            )
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
                .route("/employees/{id}", web::get().to(get_employee)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/employees/5")
            .insert_header(admin)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri("/employees/5")
            .insert_header(user)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Not enough permissions");
    }
}

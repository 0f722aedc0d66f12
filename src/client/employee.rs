use reqwest::Method;

use super::{ApiError, BackendClient};
use crate::model::employee::{
    CreateEmployee, CreateSalaryChange, Employee, EmployeeFilter, SalaryHistory, UpdateEmployee,
};

impl BackendClient {
    pub async fn list_employees(&self, token: &str, filter: &EmployeeFilter) -> Result<Vec<Employee>, ApiError> {
        self.get(token, "/employees", filter).await
    }

    pub async fn get_employee(&self, token: &str, id: u64) -> Result<Employee, ApiError> {
        self.get(token, &format!("/employees/{id}"), &()).await
    }

    pub async fn create_employee(&self, token: &str, body: &CreateEmployee) -> Result<Employee, ApiError> {
        self.send_json(Method::POST, token, "/employees", body).await
    }

    pub async fn update_employee(&self, token: &str, id: u64, body: &UpdateEmployee) -> Result<Employee, ApiError> {
        self.send_json(Method::PUT, token, &format!("/employees/{id}"), body).await
    }

    pub async fn delete_employee(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/employees/{id}")).await
    }

    pub async fn salary_history(&self, token: &str, employee_id: u64) -> Result<Vec<SalaryHistory>, ApiError> {
        self.get(token, &format!("/employees/{employee_id}/salary-history"), &())
            .await
    }

    pub async fn add_salary_change(
        &self,
        token: &str,
        employee_id: u64,
        body: &CreateSalaryChange,
    ) -> Result<SalaryHistory, ApiError> {
        self.send_json(
            Method::POST,
            token,
            &format!("/employees/{employee_id}/salary-history"),
            body,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::client_for;
    use crate::model::employee::EmployeeFilter;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_employees_sends_only_present_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees"))
            .and(query_param("department", "Finance"))
            .and(query_param("is_active", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "full_name": "Ivan Sidorov",
                "position": "Accountant",
                "department": "Finance",
                "base_salary": 150000.0,
                "hire_date": "2024-01-15",
                "is_active": true
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = EmployeeFilter {
            department: Some("Finance".to_string()),
            is_active: Some(true),
            ..Default::default()
        };
        let employees = client_for(&server).list_employees("t", &filter).await.unwrap();

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].full_name, "Ivan Sidorov");
        assert_eq!(employees[0].monthly_bonus_base, 0.0);
    }

    #[tokio::test]
    async fn delete_ignores_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/employees/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_employee("t", 5).await.unwrap();
    }
}

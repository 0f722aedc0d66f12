use reqwest::Method;

use super::{ApiError, BackendClient};
use crate::model::scenario::{
    CompareYearsQuery, CreateScenario, InsuranceRate, PayrollScenario, SaveInsuranceRate, ScenarioResult,
    YearComparison, YearFilter,
};

impl BackendClient {
    pub async fn list_insurance_rates(&self, token: &str, filter: &YearFilter) -> Result<Vec<InsuranceRate>, ApiError> {
        self.get(token, "/payroll-scenarios/insurance-rates", filter).await
    }

    pub async fn create_insurance_rate(
        &self,
        token: &str,
        body: &SaveInsuranceRate,
    ) -> Result<InsuranceRate, ApiError> {
        self.send_json(Method::POST, token, "/payroll-scenarios/insurance-rates", body)
            .await
    }

    pub async fn update_insurance_rate(
        &self,
        token: &str,
        id: u64,
        body: &SaveInsuranceRate,
    ) -> Result<InsuranceRate, ApiError> {
        self.send_json(
            Method::PUT,
            token,
            &format!("/payroll-scenarios/insurance-rates/{id}"),
            body,
        )
        .await
    }

    pub async fn delete_insurance_rate(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/payroll-scenarios/insurance-rates/{id}"))
            .await
    }

    pub async fn list_scenarios(&self, token: &str) -> Result<Vec<PayrollScenario>, ApiError> {
        self.get(token, "/payroll-scenarios/scenarios", &()).await
    }

    pub async fn get_scenario(&self, token: &str, id: u64) -> Result<PayrollScenario, ApiError> {
        self.get(token, &format!("/payroll-scenarios/scenarios/{id}"), &())
            .await
    }

    pub async fn create_scenario(&self, token: &str, body: &CreateScenario) -> Result<PayrollScenario, ApiError> {
        self.send_json(Method::POST, token, "/payroll-scenarios/scenarios", body)
            .await
    }

    pub async fn delete_scenario(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/payroll-scenarios/scenarios/{id}"))
            .await
    }

    pub async fn calculate_scenario(&self, token: &str, id: u64) -> Result<ScenarioResult, ApiError> {
        self.send_json(
            Method::POST,
            token,
            &format!("/payroll-scenarios/scenarios/{id}/calculate"),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn compare_years(&self, token: &str, query: &CompareYearsQuery) -> Result<YearComparison, ApiError> {
        self.get(token, "/payroll-scenarios/compare-years", query).await
    }
}

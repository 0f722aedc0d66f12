use reqwest::Method;

use super::{ApiError, BackendClient, Download};
use crate::model::payroll::{
    NdflRequest, NdflResult, PayrollActual, PayrollFilter, PayrollImportResult, PayrollPlan, SavePayrollActual,
    SavePayrollPlan,
};

impl BackendClient {
    pub async fn list_payroll_plans(&self, token: &str, filter: &PayrollFilter) -> Result<Vec<PayrollPlan>, ApiError> {
        self.get(token, "/payroll/plans", filter).await
    }

    pub async fn create_payroll_plan(&self, token: &str, body: &SavePayrollPlan) -> Result<PayrollPlan, ApiError> {
        self.send_json(Method::POST, token, "/payroll/plans", body).await
    }

    pub async fn update_payroll_plan(
        &self,
        token: &str,
        id: u64,
        body: &SavePayrollPlan,
    ) -> Result<PayrollPlan, ApiError> {
        self.send_json(Method::PUT, token, &format!("/payroll/plans/{id}"), body)
            .await
    }

    pub async fn delete_payroll_plan(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/payroll/plans/{id}")).await
    }

    pub async fn list_payroll_actuals(
        &self,
        token: &str,
        filter: &PayrollFilter,
    ) -> Result<Vec<PayrollActual>, ApiError> {
        self.get(token, "/payroll/actuals", filter).await
    }

    pub async fn create_payroll_actual(
        &self,
        token: &str,
        body: &SavePayrollActual,
    ) -> Result<PayrollActual, ApiError> {
        self.send_json(Method::POST, token, "/payroll/actuals", body).await
    }

    pub async fn update_payroll_actual(
        &self,
        token: &str,
        id: u64,
        body: &SavePayrollActual,
    ) -> Result<PayrollActual, ApiError> {
        self.send_json(Method::PUT, token, &format!("/payroll/actuals/{id}"), body)
            .await
    }

    pub async fn delete_payroll_actual(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/payroll/actuals/{id}")).await
    }

    /// Multipart Excel upload of payroll plans.
    pub async fn import_payroll_plans(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PayrollImportResult, ApiError> {
        self.upload(token, "/payroll/plans/import", file_name, bytes).await
    }

    pub async fn export_payroll_plans(&self, token: &str, filter: &PayrollFilter) -> Result<Download, ApiError> {
        self.download(token, "/payroll/plans/export", filter).await
    }

    pub async fn export_payroll_actuals(&self, token: &str, filter: &PayrollFilter) -> Result<Download, ApiError> {
        self.download(token, "/payroll/actuals/export", filter).await
    }

    /// Authoritative progressive NDFL calculation.
    pub async fn calculate_ndfl(&self, token: &str, body: &NdflRequest) -> Result<NdflResult, ApiError> {
        self.send_json(Method::POST, token, "/payroll/calculate-ndfl", body)
            .await
    }
}

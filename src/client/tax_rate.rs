use reqwest::Method;

use super::{ApiError, BackendClient};
use crate::model::scenario::YearFilter;
use crate::model::tax_rate::{InitializeRatesResult, SaveTaxRate, TaxRate};

impl BackendClient {
    pub async fn list_tax_rates(&self, token: &str, filter: &YearFilter) -> Result<Vec<TaxRate>, ApiError> {
        self.get(token, "/tax-rates/", filter).await
    }

    pub async fn create_tax_rate(&self, token: &str, body: &SaveTaxRate) -> Result<TaxRate, ApiError> {
        self.send_json(Method::POST, token, "/tax-rates/", body).await
    }

    pub async fn update_tax_rate(&self, token: &str, id: u64, body: &SaveTaxRate) -> Result<TaxRate, ApiError> {
        self.send_json(Method::PUT, token, &format!("/tax-rates/{id}"), body)
            .await
    }

    pub async fn delete_tax_rate(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/tax-rates/{id}")).await
    }

    /// Seeds the backend with the statutory default rates.
    pub async fn initialize_default_tax_rates(&self, token: &str) -> Result<InitializeRatesResult, ApiError> {
        self.send_json(
            Method::POST,
            token,
            "/tax-rates/initialize-default",
            &serde_json::json!({}),
        )
        .await
    }
}

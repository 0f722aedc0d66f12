use reqwest::Method;

use super::{ApiError, BackendClient};
use crate::model::directory::{Contractor, RevenuePlan, SaveRevenuePlan};
use crate::model::scenario::YearFilter;
use crate::model::user::User;

impl BackendClient {
    pub async fn list_revenue_plans(&self, token: &str, filter: &YearFilter) -> Result<Vec<RevenuePlan>, ApiError> {
        self.get(token, "/revenue/plans", filter).await
    }

    pub async fn create_revenue_plan(&self, token: &str, body: &SaveRevenuePlan) -> Result<RevenuePlan, ApiError> {
        self.send_json(Method::POST, token, "/revenue/plans", body).await
    }

    pub async fn update_revenue_plan(
        &self,
        token: &str,
        id: u64,
        body: &SaveRevenuePlan,
    ) -> Result<RevenuePlan, ApiError> {
        self.send_json(Method::PUT, token, &format!("/revenue/plans/{id}"), body)
            .await
    }

    pub async fn delete_revenue_plan(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/revenue/plans/{id}")).await
    }

    pub async fn list_contractors(&self, token: &str) -> Result<Vec<Contractor>, ApiError> {
        self.get(token, "/contractors", &()).await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        self.get(token, "/users", &()).await
    }
}

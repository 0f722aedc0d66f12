use reqwest::Method;

use super::{ApiError, BackendClient, Download};
use crate::budget::workflow::BudgetAction;
use crate::model::budget::{
    BudgetPlanDetail, BudgetVersion, BudgetVersionFilter, Category, CreateBudgetVersion, SavePlanDetail,
    TransitionRequest,
};

impl BackendClient {
    pub async fn list_budget_versions(
        &self,
        token: &str,
        filter: &BudgetVersionFilter,
    ) -> Result<Vec<BudgetVersion>, ApiError> {
        self.get(token, "/budget/versions", filter).await
    }

    pub async fn get_budget_version(&self, token: &str, id: u64) -> Result<BudgetVersion, ApiError> {
        self.get(token, &format!("/budget/versions/{id}"), &()).await
    }

    pub async fn create_budget_version(
        &self,
        token: &str,
        body: &CreateBudgetVersion,
    ) -> Result<BudgetVersion, ApiError> {
        self.send_json(Method::POST, token, "/budget/versions", body).await
    }

    pub async fn delete_budget_version(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.delete(token, &format!("/budget/versions/{id}")).await
    }

    /// One workflow step; the backend validates the transition again.
    pub async fn transition_budget_version(
        &self,
        token: &str,
        id: u64,
        action: BudgetAction,
        body: &TransitionRequest,
    ) -> Result<BudgetVersion, ApiError> {
        self.send_json(
            Method::POST,
            token,
            &format!("/budget/versions/{id}/{}", action.path_segment()),
            body,
        )
        .await
    }

    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, ApiError> {
        self.get(token, "/budget/categories", &()).await
    }

    pub async fn list_plan_details(&self, token: &str, version_id: u64) -> Result<Vec<BudgetPlanDetail>, ApiError> {
        self.get(token, &format!("/budget/versions/{version_id}/details"), &())
            .await
    }

    pub async fn create_plan_detail(&self, token: &str, body: &SavePlanDetail) -> Result<BudgetPlanDetail, ApiError> {
        self.send_json(Method::POST, token, "/budget/plan-details", body).await
    }

    pub async fn update_plan_detail(
        &self,
        token: &str,
        id: u64,
        body: &SavePlanDetail,
    ) -> Result<BudgetPlanDetail, ApiError> {
        self.send_json(Method::PUT, token, &format!("/budget/plan-details/{id}"), body)
            .await
    }

    pub async fn export_budget_version(&self, token: &str, id: u64) -> Result<Download, ApiError> {
        self.download(token, &format!("/budget/versions/{id}/export"), &())
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::budget::workflow::BudgetAction;
    use crate::client::tests::client_for;
    use crate::model::budget::{BudgetStatus, TransitionRequest};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn request_changes_hits_hyphenated_path_with_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/budget/versions/7/request-changes"))
            .and(body_json(json!({"comment": "Split travel costs"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "year": 2026,
                "version_name": "Base",
                "status": "CHANGES_REQUESTED",
                "created_by": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = TransitionRequest {
            comment: Some("Split travel costs".to_string()),
        };
        let version = client_for(&server)
            .transition_budget_version("t", 7, BudgetAction::RequestChanges, &body)
            .await
            .unwrap();

        assert_eq!(version.status, BudgetStatus::ChangesRequested);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    ChangesRequested,
}

impl BudgetStatus {
    /// Approved and rejected versions never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BudgetStatus::Approved | BudgetStatus::Rejected)
    }

    /// Plan cells can be edited only before submission or after changes were requested.
    pub fn is_editable(&self) -> bool {
        matches!(self, BudgetStatus::Draft | BudgetStatus::ChangesRequested)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 7,
    "year": 2026,
    "version_name": "Base plan v2",
    "status": "SUBMITTED",
    "created_by": 3,
    "comment": null,
    "created_at": "2025-10-01T09:00:00Z",
    "updated_at": "2025-10-03T12:30:00Z"
}))]
pub struct BudgetVersion {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = "Base plan v2")]
    pub version_name: String,
    pub status: BudgetStatus,
    /// User id of the author
    #[schema(example = 3, nullable = true)]
    #[serde(default)]
    pub created_by: Option<u64>,
    #[schema(nullable = true)]
    #[serde(default)]
    pub comment: Option<String>,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBudgetVersion {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = "Base plan v2")]
    pub version_name: String,
    /// Version to copy plan details from
    #[schema(example = 6, nullable = true)]
    pub copy_from_version_id: Option<u64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct BudgetVersionFilter {
    /// Filter by budget year
    pub year: Option<i32>,
    /// Filter by workflow status
    #[param(value_type = Option<String>)]
    pub status: Option<BudgetStatus>,
}

/// Body of a workflow transition call; the comment is used by reject and request-changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TransitionRequest {
    #[schema(example = "Travel budget too high", nullable = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[schema(example = 12)]
    pub id: u64,
    #[schema(example = "Office rent")]
    pub name: String,
    #[schema(example = 3, nullable = true)]
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[schema(example = "OPEX", nullable = true)]
    #[serde(default)]
    pub category_type: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// One cell of a budget version: planned amount of a category for a month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetPlanDetail {
    #[schema(example = 501)]
    pub id: u64,
    #[schema(example = 7)]
    pub version_id: u64,
    #[schema(example = 12)]
    pub category_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 350000.0)]
    pub planned_amount: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavePlanDetail {
    #[schema(example = 7)]
    pub version_id: u64,
    #[schema(example = 12)]
    pub category_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 350000.0)]
    pub planned_amount: f64,
}

fn active() -> bool {
    true
}

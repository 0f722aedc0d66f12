use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevenuePlan {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = "Consulting")]
    pub revenue_stream: String,
    #[schema(example = 12000000.0)]
    pub planned_amount: f64,
    #[schema(example = 11500000.0, nullable = true)]
    #[serde(default)]
    pub actual_amount: Option<f64>,
    #[serde(default)]
    pub contractor_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveRevenuePlan {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = "Consulting")]
    pub revenue_stream: String,
    #[schema(example = 12000000.0)]
    pub planned_amount: f64,
    pub actual_amount: Option<f64>,
    pub contractor_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contractor {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "OOO Romashka")]
    pub name: String,
    #[schema(example = "7701234567", nullable = true)]
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaxRate {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "INCOME_TAX")]
    pub tax_type: String,
    #[schema(example = 0.13)]
    pub rate: f64,
    #[schema(example = 2400000.0, nullable = true)]
    #[serde(default)]
    pub threshold_amount: Option<f64>,
    #[schema(example = 0.15, nullable = true)]
    #[serde(default)]
    pub rate_above_threshold: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveTaxRate {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "INCOME_TAX")]
    pub tax_type: String,
    #[schema(example = 0.13)]
    pub rate: f64,
    pub threshold_amount: Option<f64>,
    pub rate_above_threshold: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitializeRatesResult {
    #[schema(example = "Default rates initialized")]
    pub message: String,
    #[schema(example = 8)]
    #[serde(default)]
    pub created_count: u32,
}

fn active() -> bool {
    true
}

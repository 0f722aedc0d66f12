use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusType {
    Fixed,
    PerformanceBased,
    Mixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollPlan {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = 150000.0)]
    pub base_salary: f64,
    #[schema(example = 30000.0)]
    #[serde(default)]
    pub monthly_bonus: f64,
    #[serde(default)]
    pub bonus_type: Option<BonusType>,
    #[schema(example = 10.0, nullable = true)]
    #[serde(default)]
    pub depremiation_threshold: Option<f64>,
    #[schema(example = 50.0, nullable = true)]
    #[serde(default)]
    pub fixed_part: Option<f64>,
    #[schema(example = 180000.0)]
    #[serde(default)]
    pub total_planned: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavePayrollPlan {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = 150000.0)]
    pub base_salary: f64,
    #[schema(example = 30000.0)]
    #[serde(default)]
    pub monthly_bonus: f64,
    pub bonus_type: Option<BonusType>,
    pub depremiation_threshold: Option<f64>,
    pub fixed_part: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollActual {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = 150000.0)]
    pub base_salary_paid: f64,
    #[schema(example = 22500.0)]
    #[serde(default)]
    pub bonus_paid: f64,
    #[schema(example = 22425.0)]
    #[serde(default)]
    pub income_tax_amount: f64,
    #[schema(example = 52095.0)]
    #[serde(default)]
    pub social_tax_amount: f64,
    #[schema(example = 172500.0)]
    #[serde(default)]
    pub total_paid: f64,
    #[schema(example = "2025-03-31", value_type = String, format = "date", nullable = true)]
    #[serde(default)]
    pub payment_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavePayrollActual {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = 150000.0)]
    pub base_salary_paid: f64,
    #[schema(example = 22500.0)]
    #[serde(default)]
    pub bonus_paid: f64,
    #[schema(example = 22425.0)]
    #[serde(default)]
    pub income_tax_amount: f64,
    #[schema(example = 52095.0)]
    #[serde(default)]
    pub social_tax_amount: f64,
    #[schema(example = "2025-03-31", value_type = String, format = "date", nullable = true)]
    pub payment_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct PayrollFilter {
    /// Filter by year
    pub year: Option<i32>,
    /// Filter by month (1-12)
    pub month: Option<u32>,
    /// Filter by employee
    pub employee_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollImportResult {
    #[schema(example = 42)]
    pub created: u32,
    #[schema(example = 3)]
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Input of the progressive NDFL calculation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NdflRequest {
    #[schema(example = 200000.0)]
    pub current_month_income: f64,
    #[schema(example = 2300000.0)]
    pub ytd_income_before_month: f64,
    #[schema(example = 299000.0)]
    pub ytd_tax_withheld: f64,
    #[schema(example = 2025)]
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NdflResult {
    #[schema(example = 28000.0)]
    pub tax_to_withhold: f64,
    #[schema(example = 0.14)]
    pub monthly_effective_rate: f64,
    #[schema(example = "progressive_2025")]
    pub system: String,
    #[schema(example = 2500000.0)]
    pub ytd_income_total: f64,
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Employer insurance contribution rate for a year (pension, medical, social, injury).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsuranceRate {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "PENSION")]
    pub rate_type: String,
    #[schema(example = 0.22)]
    pub rate: f64,
    #[schema(example = 2759000.0, nullable = true)]
    #[serde(default)]
    pub threshold_amount: Option<f64>,
    #[schema(example = 0.10, nullable = true)]
    #[serde(default)]
    pub rate_above_threshold: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveInsuranceRate {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "PENSION")]
    pub rate_type: String,
    #[schema(example = 0.22)]
    pub rate: f64,
    pub threshold_amount: Option<f64>,
    pub rate_above_threshold: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct YearFilter {
    /// Filter by year
    pub year: Option<i32>,
}

/// What-if payroll scenario: headcount and salary changes applied to a base year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollScenario {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Indexation 2026")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = 2025)]
    pub base_year: i32,
    #[schema(example = 2026)]
    pub target_year: i32,
    #[schema(example = 5)]
    #[serde(default)]
    pub headcount_change_percent: f64,
    #[schema(example = 8)]
    #[serde(default)]
    pub salary_change_percent: f64,
    #[schema(example = "2025-11-01T10:00:00Z", value_type = String, format = "date-time", nullable = true)]
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateScenario {
    #[schema(example = "Indexation 2026")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 2025)]
    pub base_year: i32,
    #[schema(example = 2026)]
    pub target_year: i32,
    #[serde(default)]
    pub headcount_change_percent: f64,
    #[serde(default)]
    pub salary_change_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScenarioResult {
    #[schema(example = 1)]
    pub scenario_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 54000000.0)]
    pub total_fot: f64,
    #[schema(example = 7020000.0)]
    #[serde(default)]
    pub total_income_tax: f64,
    #[schema(example = 16308000.0)]
    #[serde(default)]
    pub total_insurance: f64,
    #[schema(example = 70308000.0)]
    pub total_cost: f64,
    #[schema(example = 4200000.0)]
    #[serde(default)]
    pub difference_from_base: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct CompareYearsQuery {
    #[schema(example = 2024)]
    pub base_year: i32,
    #[schema(example = 2025)]
    pub target_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YearComparison {
    #[schema(example = 2024)]
    pub base_year: i32,
    #[schema(example = 2025)]
    pub target_year: i32,
    #[schema(example = 50000000.0)]
    pub base_total_cost: f64,
    #[schema(example = 54000000.0)]
    pub target_total_cost: f64,
    #[schema(example = 4000000.0)]
    pub difference: f64,
    #[schema(example = 8.0)]
    pub difference_percent: f64,
}

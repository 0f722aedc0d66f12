use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::round_money;
use super::tax::{EmployerContributions, employer_contributions};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryInput {
    #[schema(example = 150000.0)]
    pub base_salary: f64,
    #[schema(example = 30000.0)]
    #[serde(default)]
    pub monthly_bonus: f64,
    /// Flat NDFL rate; the configured default applies when omitted
    #[schema(example = 0.13, nullable = true)]
    #[serde(default)]
    pub ndfl_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryPreview {
    #[schema(example = 180000.0)]
    pub gross: f64,
    #[schema(example = 23400.0)]
    pub ndfl: f64,
    #[schema(example = 156600.0)]
    pub net: f64,
    pub contributions: EmployerContributions,
    /// Gross plus employer contributions
    #[schema(example = 234360.0)]
    pub total_employer_cost: f64,
    #[schema(example = 2160000.0)]
    pub annual_gross: f64,
}

/// Monthly salary calculator: what the employee gets and what the employer pays.
pub fn salary_preview(base_salary: f64, monthly_bonus: f64, ndfl_rate: f64) -> SalaryPreview {
    let gross = round_money(base_salary + monthly_bonus);
    let ndfl = round_money(gross * ndfl_rate);
    let contributions = employer_contributions(gross);
    let total_employer_cost = round_money(gross + contributions.total);

    SalaryPreview {
        gross,
        ndfl,
        net: round_money(gross - ndfl),
        contributions,
        total_employer_cost,
        annual_gross: round_money(gross * 12.0),
    }
}

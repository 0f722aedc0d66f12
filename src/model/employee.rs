use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "full_name": "Ivan Sidorov",
        "position": "Senior accountant",
        "department": "Finance",
        "base_salary": 150000.0,
        "monthly_bonus_base": 30000.0,
        "hire_date": "2024-01-15",
        "is_active": true
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Ivan Sidorov")]
    pub full_name: String,

    #[schema(example = "Senior accountant")]
    pub position: String,

    #[schema(example = "Finance", nullable = true)]
    pub department: Option<String>,

    #[schema(example = 150000.0)]
    pub base_salary: f64,

    #[schema(example = 30000.0)]
    #[serde(default)]
    pub monthly_bonus_base: f64,

    #[schema(example = "2024-01-15", value_type = String, format = "date", nullable = true)]
    pub hire_date: Option<NaiveDate>,

    #[schema(example = "2025-06-30", value_type = String, format = "date", nullable = true)]
    #[serde(default)]
    pub fire_date: Option<NaiveDate>,

    #[schema(example = true)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Ivan Sidorov")]
    pub full_name: String,
    #[schema(example = "Senior accountant")]
    pub position: String,
    #[schema(example = "Finance", nullable = true)]
    pub department: Option<String>,
    #[schema(example = 150000.0)]
    pub base_salary: f64,
    #[schema(example = 30000.0)]
    #[serde(default)]
    pub monthly_bonus_base: f64,
    #[schema(example = "2024-01-15", value_type = String, format = "date", nullable = true)]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_bonus_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[schema(value_type = String, format = "date")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeFilter {
    /// Search by name or position
    pub search: Option<String>,
    /// Filter by department
    pub department: Option<String>,
    /// Filter by activity flag
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryHistory {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 140000.0)]
    pub old_salary: f64,
    #[schema(example = 150000.0)]
    pub new_salary: f64,
    #[schema(example = "2025-03-01", value_type = String, format = "date")]
    pub effective_date: NaiveDate,
    #[schema(example = "Annual review", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSalaryChange {
    #[schema(example = 150000.0)]
    pub new_salary: f64,
    #[schema(example = "2025-03-01", value_type = String, format = "date")]
    pub effective_date: NaiveDate,
    #[schema(example = "Annual review", nullable = true)]
    pub reason: Option<String>,
}

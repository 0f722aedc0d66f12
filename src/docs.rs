use crate::api::budget::BudgetVersionView;
use crate::api::preview::{BonusInput, BonusPreview, FlatTaxInput, FlatTaxResponse, NdflSource};
use crate::budget::changes::{CellEdit, FailedCell, SaveOutcome};
use crate::budget::rollup::{BudgetRollup, RollupRow};
use crate::budget::workflow::BudgetAction;
use crate::calc::salary::{SalaryInput, SalaryPreview};
use crate::calc::tax::{EmployerContributions, FlatTaxPreview};
use crate::model::budget::{
    BudgetPlanDetail, BudgetStatus, BudgetVersion, BudgetVersionFilter, Category, CreateBudgetVersion,
    SavePlanDetail, TransitionRequest,
};
use crate::model::directory::{Contractor, RevenuePlan, SaveRevenuePlan};
use crate::model::employee::{CreateEmployee, CreateSalaryChange, Employee, SalaryHistory, UpdateEmployee};
use crate::model::payroll::{
    BonusType, NdflRequest, NdflResult, PayrollActual, PayrollImportResult, PayrollPlan, SavePayrollActual,
    SavePayrollPlan,
};
use crate::model::role::Role;
use crate::model::scenario::{
    CompareYearsQuery, CreateScenario, InsuranceRate, PayrollScenario, SaveInsuranceRate, ScenarioResult,
    YearComparison,
};
use crate::model::tax_rate::{InitializeRatesResult, SaveTaxRate, TaxRate};
use crate::model::user::User;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll & Budget Planning API",
        version = "1.0.0",
        description = r#"
## Payroll (FOT) and budget planning gateway

Sits between the planning UI and the payroll/budget backend. Requests are
authenticated with the backend's JWT bearer tokens and forwarded with the same token.

### Key Features
- **Employees**: profiles and salary history
- **Payroll**: plans, actuals, Excel import and export
- **Previews**: bonus, flat tax, progressive NDFL and salary calculators
- **Scenarios**: insurance rates, what-if scenarios, year comparison
- **Budget**: versions, approval workflow, category rollup, batch cell save

### Errors
Every error body is `{"detail": "<message>"}`. Backend messages are passed through.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::salary_history,
        crate::api::employee::add_salary_change,

        crate::api::payroll::list_plans,
        crate::api::payroll::create_plan,
        crate::api::payroll::update_plan,
        crate::api::payroll::delete_plan,
        crate::api::payroll::import_plans,
        crate::api::payroll::export_plans,
        crate::api::payroll::list_actuals,
        crate::api::payroll::create_actual,
        crate::api::payroll::update_actual,
        crate::api::payroll::delete_actual,
        crate::api::payroll::export_actuals,

        crate::api::preview::bonus,
        crate::api::preview::flat_tax,
        crate::api::preview::ndfl,
        crate::api::preview::salary,

        crate::api::scenario::list_insurance_rates,
        crate::api::scenario::create_insurance_rate,
        crate::api::scenario::update_insurance_rate,
        crate::api::scenario::delete_insurance_rate,
        crate::api::scenario::list_scenarios,
        crate::api::scenario::get_scenario,
        crate::api::scenario::create_scenario,
        crate::api::scenario::delete_scenario,
        crate::api::scenario::calculate_scenario,
        crate::api::scenario::compare_years,

        crate::api::tax_rate::list_tax_rates,
        crate::api::tax_rate::create_tax_rate,
        crate::api::tax_rate::update_tax_rate,
        crate::api::tax_rate::delete_tax_rate,
        crate::api::tax_rate::initialize_default,

        crate::api::budget::list_versions,
        crate::api::budget::get_version,
        crate::api::budget::create_version,
        crate::api::budget::delete_version,
        crate::api::budget::transition,
        crate::api::budget::list_categories,
        crate::api::budget::list_details,
        crate::api::budget::save_details,
        crate::api::budget::version_rollup,
        crate::api::budget::export_version,

        crate::api::directory::list_revenue_plans,
        crate::api::directory::create_revenue_plan,
        crate::api::directory::update_revenue_plan,
        crate::api::directory::delete_revenue_plan,
        crate::api::directory::list_contractors,
        crate::api::directory::list_users
    ),
    components(
        schemas(
            Role,
            User,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            SalaryHistory,
            CreateSalaryChange,
            BonusType,
            PayrollPlan,
            SavePayrollPlan,
            PayrollActual,
            SavePayrollActual,
            PayrollImportResult,
            NdflRequest,
            NdflResult,
            BonusInput,
            BonusPreview,
            FlatTaxInput,
            FlatTaxPreview,
            FlatTaxResponse,
            NdflSource,
            EmployerContributions,
            SalaryInput,
            SalaryPreview,
            InsuranceRate,
            SaveInsuranceRate,
            PayrollScenario,
            CreateScenario,
            ScenarioResult,
            CompareYearsQuery,
            YearComparison,
            TaxRate,
            SaveTaxRate,
            InitializeRatesResult,
            BudgetStatus,
            BudgetAction,
            BudgetVersion,
            BudgetVersionView,
            BudgetVersionFilter,
            CreateBudgetVersion,
            TransitionRequest,
            Category,
            BudgetPlanDetail,
            SavePlanDetail,
            CellEdit,
            FailedCell,
            SaveOutcome,
            RollupRow,
            BudgetRollup,
            RevenuePlan,
            SaveRevenuePlan,
            Contractor
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll plans and actuals"),
        (name = "Preview", description = "Non-authoritative payroll calculators"),
        (name = "Scenario", description = "Insurance rates and payroll scenarios"),
        (name = "Tax rate", description = "Tax rate tables"),
        (name = "Budget", description = "Budget versions, workflow and rollup"),
        (name = "Directory", description = "Revenue plans, contractors and users"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_has_bearer_scheme_and_workflow_path() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(json["paths"]["/api/budget/versions/{version_id}/{action}"]["post"].is_object());
        assert!(json["paths"]["/api/payroll/preview/ndfl"]["post"].is_object());
    }
}

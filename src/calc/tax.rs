use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::round_money;
use crate::model::payroll::{NdflRequest, NdflResult};

pub const PENSION_RATE: f64 = 0.22;
pub const MEDICAL_RATE: f64 = 0.051;
pub const SOCIAL_RATE: f64 = 0.029;
pub const INJURY_RATE: f64 = 0.002;
/// Flat employer contribution placeholder (pension + medical + social + injury).
pub const EMPLOYER_SOCIAL_RATE: f64 = 0.302;

/// Upper bound of a tier (None = unbounded) and its marginal rate.
type Tier = (Option<f64>, f64);

const NDFL_2025_TIERS: [Tier; 5] = [
    (Some(2_400_000.0), 0.13),
    (Some(5_000_000.0), 0.15),
    (Some(20_000_000.0), 0.18),
    (Some(50_000_000.0), 0.20),
    (None, 0.22),
];

const NDFL_2021_TIERS: [Tier; 2] = [(Some(5_000_000.0), 0.13), (None, 0.15)];

pub const SYSTEM_2025: &str = "progressive_2025";
pub const SYSTEM_2021: &str = "progressive_2021";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlatTaxPreview {
    #[schema(example = 200000.0)]
    pub gross: f64,
    #[schema(example = 174000.0)]
    pub net: f64,
    #[schema(example = 26000.0)]
    pub tax: f64,
    #[schema(example = 60400.0)]
    pub employer_social_tax: f64,
}

/// `net = gross * (1 - rate)`, `tax = gross - net`.
pub fn flat_tax_preview(gross: f64, rate: f64) -> FlatTaxPreview {
    let net = gross * (1.0 - rate);
    FlatTaxPreview {
        gross,
        net,
        tax: gross - net,
        employer_social_tax: gross * EMPLOYER_SOCIAL_RATE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployerContributions {
    #[schema(example = 44000.0)]
    pub pension: f64,
    #[schema(example = 10200.0)]
    pub medical: f64,
    #[schema(example = 5800.0)]
    pub social: f64,
    #[schema(example = 400.0)]
    pub injury: f64,
    #[schema(example = 60400.0)]
    pub total: f64,
}

pub fn employer_contributions(gross: f64) -> EmployerContributions {
    let pension = round_money(gross * PENSION_RATE);
    let medical = round_money(gross * MEDICAL_RATE);
    let social = round_money(gross * SOCIAL_RATE);
    let injury = round_money(gross * INJURY_RATE);
    EmployerContributions {
        pension,
        medical,
        social,
        injury,
        total: round_money(pension + medical + social + injury),
    }
}

fn tiers_for(year: i32) -> (&'static [Tier], &'static str) {
    if year >= 2025 {
        (&NDFL_2025_TIERS, SYSTEM_2025)
    } else {
        (&NDFL_2021_TIERS, SYSTEM_2021)
    }
}

/// Cumulative tax on a year-to-date income.
fn progressive_tax(income: f64, tiers: &[Tier]) -> f64 {
    let mut tax = 0.0;
    let mut lower = 0.0;
    for &(upper, rate) in tiers {
        if income <= lower {
            break;
        }
        let top = upper.map_or(income, |u| income.min(u));
        tax += (top - lower) * rate;
        match upper {
            Some(u) => lower = u,
            None => break,
        }
    }
    tax
}

/// Local rendition of the progressive NDFL schedule.
///
/// Tax is computed on the year-to-date total and reduced by what was already
/// withheld, so a month that crosses a tier boundary is taxed at both rates.
pub fn ndfl_preview(request: &NdflRequest) -> NdflResult {
    let (tiers, system) = tiers_for(request.year);
    let current = request.current_month_income.max(0.0);
    let ytd_total = request.ytd_income_before_month.max(0.0) + current;

    let total_tax = progressive_tax(ytd_total, tiers).round();
    let tax_to_withhold = (total_tax - request.ytd_tax_withheld).max(0.0);
    let monthly_effective_rate = if current > 0.0 {
        tax_to_withhold / current
    } else {
        0.0
    };

    NdflResult {
        tax_to_withhold,
        monthly_effective_rate,
        system: system.to_string(),
        ytd_income_total: ytd_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(current: f64, before: f64, withheld: f64, year: i32) -> NdflRequest {
        NdflRequest {
            current_month_income: current,
            ytd_income_before_month: before,
            ytd_tax_withheld: withheld,
            year,
        }
    }

    #[test]
    fn flat_tax_parts_add_up_to_gross() {
        for gross in [0.0, 1.0, 12_345.67, 200_000.0, 9_999_999.99] {
            for rate in [0.0, 0.13, 0.15, 0.3, 0.5, 0.87, 1.0] {
                let preview = flat_tax_preview(gross, rate);
                assert!((preview.net + preview.tax - gross).abs() < 1e-6, "gross={gross} rate={rate}");
            }
        }
    }

    #[test]
    fn flat_tax_example() {
        let preview = flat_tax_preview(200_000.0, 0.13);
        assert!((preview.net - 174_000.0).abs() < 1e-6);
        assert!((preview.tax - 26_000.0).abs() < 1e-6);
        assert!((preview.employer_social_tax - 60_400.0).abs() < 1e-6);
    }

    #[test]
    fn contributions_breakdown_sums_to_placeholder_rate() {
        let c = employer_contributions(200_000.0);
        assert_eq!(c.pension, 44_000.0);
        assert_eq!(c.medical, 10_200.0);
        assert_eq!(c.social, 5_800.0);
        assert_eq!(c.injury, 400.0);
        assert_eq!(c.total, 60_400.0);
    }

    #[test]
    fn first_tier_month() {
        let result = ndfl_preview(&request(100_000.0, 0.0, 0.0, 2025));
        assert_eq!(result.tax_to_withhold, 13_000.0);
        assert!((result.monthly_effective_rate - 0.13).abs() < 1e-12);
        assert_eq!(result.system, SYSTEM_2025);
        assert_eq!(result.ytd_income_total, 100_000.0);
    }

    #[test]
    fn month_crossing_first_boundary_is_split() {
        // 2.3M before, 200k now: 100k at 13% and 100k at 15%
        let result = ndfl_preview(&request(200_000.0, 2_300_000.0, 299_000.0, 2025));
        assert_eq!(result.tax_to_withhold, 28_000.0);
        assert!((result.monthly_effective_rate - 0.14).abs() < 1e-12);
        assert_eq!(result.ytd_income_total, 2_500_000.0);
    }

    #[test]
    fn top_tier_applies_above_fifty_million() {
        let tax = progressive_tax(60_000_000.0, &NDFL_2025_TIERS);
        let expected = 2_400_000.0 * 0.13
            + 2_600_000.0 * 0.15
            + 15_000_000.0 * 0.18
            + 30_000_000.0 * 0.20
            + 10_000_000.0 * 0.22;
        assert!((tax - expected).abs() < 1e-6);
    }

    #[test]
    fn years_before_2025_use_two_tiers() {
        let result = ndfl_preview(&request(1_000_000.0, 4_500_000.0, 585_000.0, 2024));
        // 500k at 13% + 500k at 15%
        assert_eq!(result.tax_to_withhold, 140_000.0);
        assert_eq!(result.system, SYSTEM_2021);
    }

    #[test]
    fn over_withheld_never_goes_negative() {
        let result = ndfl_preview(&request(50_000.0, 100_000.0, 100_000.0, 2025));
        assert_eq!(result.tax_to_withhold, 0.0);
    }

    #[test]
    fn zero_income_month_has_zero_rate() {
        let result = ndfl_preview(&request(0.0, 500_000.0, 65_000.0, 2025));
        assert_eq!(result.tax_to_withhold, 0.0);
        assert_eq!(result.monthly_effective_rate, 0.0);
    }
}

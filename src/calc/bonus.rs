use crate::model::payroll::BonusType;

/// Share of a MIXED bonus that is paid regardless of KPI, when none is given.
pub const DEFAULT_FIXED_PART: f64 = 50.0;

/// Bonus payout for a KPI score.
///
/// `kpi`, `threshold` and `fixed_part` are percentages. Below the depremiation
/// threshold nothing is paid, whatever the bonus type.
pub fn calculate_bonus(base: f64, kpi: f64, threshold: f64, bonus_type: BonusType, fixed_part: Option<f64>) -> f64 {
    if kpi < threshold {
        return 0.0;
    }

    match bonus_type {
        BonusType::Fixed => base,
        BonusType::PerformanceBased => base * (kpi / 100.0),
        BonusType::Mixed => {
            let fixed = fixed_part.unwrap_or(DEFAULT_FIXED_PART).clamp(0.0, 100.0);
            base * fixed / 100.0 + base * (100.0 - fixed) / 100.0 * (kpi / 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BonusType; 3] = [BonusType::Fixed, BonusType::PerformanceBased, BonusType::Mixed];

    #[test]
    fn mixed_example() {
        let bonus = calculate_bonus(100_000.0, 50.0, 10.0, BonusType::Mixed, Some(50.0));
        assert_eq!(bonus, 75_000.0);
    }

    #[test]
    fn below_threshold_pays_nothing() {
        for bonus_type in ALL {
            for kpi in [0.0, 5.0, 29.99] {
                assert_eq!(calculate_bonus(80_000.0, kpi, 30.0, bonus_type, Some(40.0)), 0.0);
            }
        }
    }

    #[test]
    fn threshold_itself_is_paid() {
        assert_eq!(calculate_bonus(80_000.0, 30.0, 30.0, BonusType::Fixed, None), 80_000.0);
    }

    #[test]
    fn fixed_ignores_kpi() {
        for kpi in [10.0, 50.0, 100.0, 150.0] {
            assert_eq!(calculate_bonus(42_000.0, kpi, 10.0, BonusType::Fixed, None), 42_000.0);
        }
    }

    #[test]
    fn performance_based_scales_with_kpi() {
        assert_eq!(calculate_bonus(60_000.0, 120.0, 0.0, BonusType::PerformanceBased, None), 72_000.0);
    }

    #[test]
    fn mixed_matches_pure_types_at_the_edges() {
        for kpi in [10.0, 35.0, 80.0, 100.0] {
            let base = 90_000.0;
            let perf = calculate_bonus(base, kpi, 0.0, BonusType::PerformanceBased, None);
            let fixed = calculate_bonus(base, kpi, 0.0, BonusType::Fixed, None);
            assert!((calculate_bonus(base, kpi, 0.0, BonusType::Mixed, Some(0.0)) - perf).abs() < 1e-9);
            assert!((calculate_bonus(base, kpi, 0.0, BonusType::Mixed, Some(100.0)) - fixed).abs() < 1e-9);
        }
    }

    #[test]
    fn mixed_fixed_part_is_clamped() {
        let over = calculate_bonus(10_000.0, 50.0, 0.0, BonusType::Mixed, Some(140.0));
        assert_eq!(over, 10_000.0);
        let under = calculate_bonus(10_000.0, 50.0, 0.0, BonusType::Mixed, Some(-20.0));
        assert_eq!(under, 5_000.0);
    }

    #[test]
    fn mixed_defaults_to_even_split() {
        let bonus = calculate_bonus(100_000.0, 50.0, 10.0, BonusType::Mixed, None);
        assert_eq!(bonus, 75_000.0);
    }
}

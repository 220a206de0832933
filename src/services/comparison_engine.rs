//! Budget comparison across all four system types.
//!
//! Repeats the sizing/savings/payback arithmetic of the estimate engine
//! per system type with a neutral segment multiplier and no chart series.
//! Pure and deterministic: two calls with the same budget produce the same
//! table, and rows share no state between calls.
//!
//! Two modeling quirks are kept on purpose (they match the published
//! comparison table, which diverges from the estimate form):
//!   - battery "savings" use a flat per-budget heuristic rather than an
//!     energy-derived figure, since batteries produce nothing;
//!   - hybrid savings carry a 1.1 optimization bonus.

use crate::errors::ValidationError;
use crate::models::estimate::{ComparisonResult, ComparisonRow, SystemType};
use crate::services::estimate_engine::{
    base_production_per_unit, cost_per_unit, ELECTRICITY_RATE,
};

/// Flat annual-savings heuristic per kWh of battery capacity.
const BATTERY_SAVINGS_PER_UNIT: f64 = 100.0;
/// Self-consumption optimization bonus applied to hybrid savings.
const HYBRID_SAVINGS_BONUS: f64 = 1.1;

/// Build the side-by-side table for one budget. Fails on non-positive
/// (or non-finite) budgets; rows are computed independently per type.
pub fn compute_comparison(budget: f64) -> Result<ComparisonResult, ValidationError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(ValidationError::NonPositiveBudget(budget));
    }

    let rows = SystemType::ALL
        .iter()
        .map(|&system_type| comparison_row(system_type, budget))
        .collect();

    Ok(ComparisonResult { budget, rows })
}

fn comparison_row(system_type: SystemType, budget: f64) -> ComparisonRow {
    let system_size = budget / cost_per_unit(system_type);
    let annual_production = base_production_per_unit(system_type) * system_size;

    let annual_savings = match system_type {
        SystemType::Battery => system_size * BATTERY_SAVINGS_PER_UNIT,
        SystemType::Hybrid => annual_production * ELECTRICITY_RATE * HYBRID_SAVINGS_BONUS,
        SystemType::Solar | SystemType::Wind => annual_production * ELECTRICITY_RATE,
    };

    let break_even_years = if annual_savings > 0.0 {
        Some(((budget / annual_savings) * 10.0).round() / 10.0)
    } else {
        None
    };
    let roi_10_year = (annual_savings * 10.0 - budget) / budget * 100.0;

    ComparisonRow {
        system_type,
        system_size: (system_size * 10.0).round() / 10.0,
        size_unit: system_type.size_unit().to_string(),
        annual_production_kwh: annual_production.round(),
        annual_savings: annual_savings.round(),
        break_even_years,
        roi_10_year_percent: roi_10_year.round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(result: &ComparisonResult, system_type: SystemType) -> &ComparisonRow {
        result
            .rows
            .iter()
            .find(|r| r.system_type == system_type)
            .unwrap()
    }

    #[test]
    fn ten_thousand_budget_produces_four_rows() {
        let result = compute_comparison(10_000.0).unwrap();
        assert_eq!(result.rows.len(), 4);

        let solar = row(&result, SystemType::Solar);
        assert_eq!(solar.system_size, 4.0, "10000 / 2500");
        assert_eq!(solar.annual_savings, 720.0);
        assert_eq!(solar.break_even_years, Some(13.9));
        assert_eq!(solar.roi_10_year_percent, -28.0);

        let wind = row(&result, SystemType::Wind);
        assert_eq!(wind.system_size, 2.0);
        assert_eq!(wind.annual_savings, 600.0);
        assert_eq!(wind.break_even_years, Some(16.7));

        // Battery savings come from the flat heuristic, not production.
        let battery = row(&result, SystemType::Battery);
        assert_eq!(battery.system_size, 12.5, "10000 / 800 kWh");
        assert_eq!(battery.size_unit, "kWh");
        assert_eq!(battery.annual_production_kwh, 0.0);
        assert_eq!(battery.annual_savings, 1250.0);
        assert_eq!(battery.break_even_years, Some(8.0));
        assert_eq!(battery.roi_10_year_percent, 25.0);

        let hybrid = row(&result, SystemType::Hybrid);
        assert_eq!(hybrid.system_size, 2.9);
        assert_eq!(hybrid.annual_savings, 707.0);

        for r in &result.rows {
            assert!(r.system_size >= 0.0);
            assert!(r.annual_savings >= 0.0);
        }
    }

    #[test]
    fn rows_never_carry_non_finite_values() {
        let result = compute_comparison(1.0).unwrap();
        for r in &result.rows {
            assert!(r.annual_savings.is_finite());
            assert!(r.roi_10_year_percent.is_finite());
            if let Some(years) = r.break_even_years {
                assert!(years.is_finite());
            }
        }
    }

    #[test]
    fn calls_are_independent() {
        let before = compute_comparison(10_000.0).unwrap();
        let _other = compute_comparison(250_000.0).unwrap();
        let after = compute_comparison(10_000.0).unwrap();
        for (a, b) in before.rows.iter().zip(&after.rows) {
            assert_eq!(a.system_size, b.system_size);
            assert_eq!(a.annual_savings, b.annual_savings);
            assert_eq!(a.break_even_years, b.break_even_years);
        }
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        assert!(compute_comparison(0.0).is_err());
        assert!(compute_comparison(-5000.0).is_err());
        assert!(compute_comparison(f64::NAN).is_err());
    }
}

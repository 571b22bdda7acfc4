//! Compound-interest and annuity primitives shared by the goal planners
//!
//! All rates are annual; contribution streams compound monthly. Every
//! function has an explicit zero/identity fallback so degenerate inputs
//! (zero rate, zero term) produce finite values rather than NaN.

use crate::models::Projection;

/// Future value of a monthly contribution stream (ordinary annuity).
///
/// `FV = PMT × ((1+r)^n − 1) / r` with a monthly rate `r`; `r == 0`
/// degenerates to `PMT × n`.
pub fn future_value_of_stream(monthly_payment: f64, annual_rate: f64, years: u32) -> f64 {
    let n = (years * 12) as f64;
    let r = annual_rate / 12.0;
    if r == 0.0 {
        return monthly_payment * n;
    }
    monthly_payment * (((1.0 + r).powf(n) - 1.0) / r)
}

/// Monthly contribution needed to reach `target` over `years` at `annual_rate`.
///
/// Inverse of [`future_value_of_stream`]. A zero-year term returns the
/// target itself (the full amount is needed now).
pub fn required_monthly_contribution(target: f64, annual_rate: f64, years: u32) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    if years == 0 {
        return target;
    }
    let n = (years * 12) as f64;
    let r = annual_rate / 12.0;
    if r == 0.0 {
        return target / n;
    }
    target * r / ((1.0 + r).powf(n) - 1.0)
}

/// Lump-sum growth at an annual compound rate
pub fn compound_growth(principal: f64, annual_rate: f64, years: u32) -> f64 {
    principal * (1.0 + annual_rate).powi(years as i32)
}

/// Build growth projections for a contribution stream on top of an
/// existing balance, at the given year horizons.
pub fn build_projections(
    monthly_payment: f64,
    existing_balance: f64,
    annual_rate: f64,
    horizons: &[u32],
) -> Vec<Projection> {
    horizons
        .iter()
        .map(|&years| {
            let total_contributions = monthly_payment * 12.0 * years as f64;
            let projected_value = future_value_of_stream(monthly_payment, annual_rate, years)
                + compound_growth(existing_balance, annual_rate, years);
            Projection {
                years,
                projected_value,
                total_contributions,
                investment_growth: projected_value - total_contributions - existing_balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_value_zero_rate() {
        assert_eq!(future_value_of_stream(100.0, 0.0, 10), 12000.0);
    }

    #[test]
    fn test_future_value_grows_with_rate() {
        let flat = future_value_of_stream(200.0, 0.0, 15);
        let grown = future_value_of_stream(200.0, 0.05, 15);
        assert!(grown > flat);
        // 200/month at 5% over 15 years is roughly £53.5k
        assert!((grown - 53457.0).abs() < 100.0);
    }

    #[test]
    fn test_required_contribution_inverts_future_value() {
        let target = 250000.0;
        let monthly = required_monthly_contribution(target, 0.05, 20);
        let accumulated = future_value_of_stream(monthly, 0.05, 20);
        assert!((accumulated - target).abs() < 1.0);
    }

    #[test]
    fn test_required_contribution_guards() {
        assert_eq!(required_monthly_contribution(0.0, 0.05, 10), 0.0);
        assert_eq!(required_monthly_contribution(-5.0, 0.05, 10), 0.0);
        // Zero term: the whole target is needed immediately
        assert_eq!(required_monthly_contribution(6000.0, 0.05, 0), 6000.0);
        // Zero rate: straight division
        assert_eq!(required_monthly_contribution(12000.0, 0.0, 10), 100.0);
    }

    #[test]
    fn test_compound_growth() {
        assert_eq!(compound_growth(1000.0, 0.0, 5), 1000.0);
        assert!((compound_growth(1000.0, 0.05, 2) - 1102.5).abs() < 1e-9);
    }

    #[test]
    fn test_projection_accounting() {
        let projections = build_projections(300.0, 10000.0, 0.05, &[5, 10, 15, 20]);
        assert_eq!(projections.len(), 4);
        for p in &projections {
            // Growth is exactly what value exceeds money put in
            let reconstructed = p.total_contributions + 10000.0 + p.investment_growth;
            assert!((p.projected_value - reconstructed).abs() < 1e-6);
        }
        assert!(projections[3].projected_value > projections[0].projected_value);
    }
}

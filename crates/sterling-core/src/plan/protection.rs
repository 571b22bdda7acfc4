//! Protection planner
//!
//! Sizes life, income-protection, and critical-illness cover from gross
//! income multiples, then estimates premiums with age-banded flat rates.
//! Rates are indicative, not quotes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::GoalType;

use super::{GoalPlan, PlanContext, Planner};

/// Monthly premium rates by age band: (band ceiling, label, life rate per
/// £1,000 of cover, critical-illness rate per £1,000 of cover, income
/// protection rate per £100 of monthly benefit).
const PREMIUM_BANDS: &[(u32, &str, f64, f64, f64)] = &[
    (30, "under 30", 0.10, 0.18, 0.50),
    (40, "30-39", 0.15, 0.28, 0.70),
    (50, "40-49", 0.25, 0.45, 1.00),
    (u32::MAX, "50+", 0.40, 0.75, 1.50),
];

fn premium_band(age: u32) -> &'static (u32, &'static str, f64, f64, f64) {
    PREMIUM_BANDS
        .iter()
        .find(|(ceiling, ..)| age < *ceiling)
        .unwrap_or(&PREMIUM_BANDS[PREMIUM_BANDS.len() - 1])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionPlan {
    pub summary: String,
    /// Lump-sum life cover (multiple of gross annual income)
    pub life_cover: f64,
    /// Monthly income-protection benefit (share of gross monthly income)
    pub income_protection_monthly: f64,
    /// Lump-sum critical-illness cover
    pub critical_illness_cover: f64,
    pub age_band: String,
    pub life_premium_monthly: f64,
    pub income_protection_premium_monthly: f64,
    pub critical_illness_premium_monthly: f64,
    pub total_premium_monthly: f64,
}

pub struct ProtectionPlanner;

impl ProtectionPlanner {
    /// Compute the typed plan; shared with the comprehensive planner
    pub fn build(ctx: &PlanContext<'_>) -> ProtectionPlan {
        let assumptions = ctx.assumptions;
        let income = ctx.income();

        let life_cover = income.annual_gross * assumptions.life_cover_multiple;
        let income_protection_monthly = income.monthly_gross * assumptions.income_protection_rate;
        let critical_illness_cover = income.annual_gross * assumptions.critical_illness_multiple;

        let &(_, band_label, life_rate, ci_rate, ip_rate) = premium_band(assumptions.current_age);

        let life_premium_monthly = life_cover / 1000.0 * life_rate;
        let critical_illness_premium_monthly = critical_illness_cover / 1000.0 * ci_rate;
        let income_protection_premium_monthly = income_protection_monthly / 100.0 * ip_rate;
        let total_premium_monthly =
            life_premium_monthly + critical_illness_premium_monthly + income_protection_premium_monthly;

        debug!(
            life_cover,
            total_premium_monthly,
            band = band_label,
            "Protection plan computed"
        );

        let summary = format!(
            "£{:.0} life cover, £{:.0}/month income protection and £{:.0} critical illness cover for roughly £{:.0}/month",
            life_cover, income_protection_monthly, critical_illness_cover, total_premium_monthly
        );

        ProtectionPlan {
            summary,
            life_cover,
            income_protection_monthly,
            critical_illness_cover,
            age_band: band_label.to_string(),
            life_premium_monthly,
            income_protection_premium_monthly,
            critical_illness_premium_monthly,
            total_premium_monthly,
        }
    }
}

impl Planner for ProtectionPlanner {
    fn goal_type(&self) -> GoalType {
        GoalType::Protection
    }

    fn name(&self) -> &'static str {
        "Protection"
    }

    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan> {
        Ok(GoalPlan::Protection(Self::build(ctx)))
    }
}

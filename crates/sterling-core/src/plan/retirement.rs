//! Retirement planner
//!
//! Works backwards from a target retirement income (a share of current net
//! income) to the pension pot that sustains it under the 4% withdrawal rule,
//! then to the monthly contribution that closes the gap between that pot and
//! any pension assets already mentioned.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{AssetKind, GoalCategory, GoalType, Projection, TimeUnit};

use super::math::{build_projections, required_monthly_contribution};
use super::{GoalPlan, PlanContext, Planner};

/// Projection horizons shared by the contribution planners
pub(crate) const PROJECTION_HORIZONS: [u32; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub summary: String,
    pub current_age: u32,
    pub retirement_age: u32,
    pub years_to_retirement: u32,
    /// Annual income wanted in retirement (replacement share of net income)
    pub target_annual_income: f64,
    pub state_pension_annual: f64,
    /// Pot needed to fund the private share under the withdrawal rule
    pub required_pot: f64,
    pub existing_pension: f64,
    pub pot_shortfall: f64,
    pub required_monthly_contribution: f64,
    /// Required contribution clamped to what current surplus can afford
    pub recommended_monthly_contribution: f64,
    pub on_track: bool,
    pub projections: Vec<Projection>,
}

pub struct RetirementPlanner;

impl RetirementPlanner {
    /// Target retirement age from goal timeframes.
    ///
    /// An explicit age ("retire at 65") wins; a duration ("in 20 years")
    /// is added to the assumed current age; otherwise the default applies.
    fn target_retirement_age(ctx: &PlanContext<'_>) -> u32 {
        for goal in &ctx.facts.goals {
            if !goal.categories.contains(&GoalCategory::Retirement) {
                continue;
            }
            for timeframe in &goal.timeframes {
                match timeframe.unit {
                    TimeUnit::Age => return timeframe.value,
                    TimeUnit::Years => return ctx.assumptions.current_age + timeframe.value,
                    _ => {}
                }
            }
        }
        ctx.assumptions.default_retirement_age
    }

    /// Compute the typed plan; shared with the comprehensive planner
    pub fn build(ctx: &PlanContext<'_>) -> RetirementPlan {
        let assumptions = ctx.assumptions;
        let income = ctx.income();
        let expenses = ctx.expenses();
        let surplus = (income.monthly_net - expenses.monthly_total).max(0.0);

        let current_age = assumptions.current_age;
        let retirement_age = Self::target_retirement_age(ctx).max(current_age);
        let years_to_retirement = retirement_age - current_age;

        let target_annual_income = income.annual_net * assumptions.income_replacement;
        let state_pension_annual = ctx.tax.state_pension.annual_amount;
        let private_income_needed = (target_annual_income - state_pension_annual).max(0.0);
        let required_pot = private_income_needed / assumptions.withdrawal_rate;

        let existing_pension = ctx.facts.asset_total(AssetKind::Pension);
        let pot_shortfall = (required_pot - existing_pension).max(0.0);

        let required = required_monthly_contribution(
            pot_shortfall,
            assumptions.growth_rate,
            years_to_retirement,
        );
        let recommended = required.min(surplus);
        let on_track = required <= surplus;

        debug!(
            retirement_age,
            required_pot, pot_shortfall, required, "Retirement plan computed"
        );

        let projections = build_projections(
            recommended,
            existing_pension,
            assumptions.growth_rate,
            &PROJECTION_HORIZONS,
        );

        let summary = format!(
            "Retiring at {} needs a pot of around £{:.0}; saving £{:.0}/month closes the gap",
            retirement_age, required_pot, required
        );

        RetirementPlan {
            summary,
            current_age,
            retirement_age,
            years_to_retirement,
            target_annual_income,
            state_pension_annual,
            required_pot,
            existing_pension,
            pot_shortfall,
            required_monthly_contribution: required,
            recommended_monthly_contribution: recommended,
            on_track,
            projections,
        }
    }
}

impl Planner for RetirementPlanner {
    fn goal_type(&self) -> GoalType {
        GoalType::Retirement
    }

    fn name(&self) -> &'static str {
        "Retirement"
    }

    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan> {
        Ok(GoalPlan::Retirement(Self::build(ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FactExtractor;
    use crate::models::RawMessage;
    use crate::plan::PlanningAssumptions;
    use crate::tax::TaxYearConfig;
    use chrono::Utc;

    fn plan_for(messages: &[&str]) -> RetirementPlan {
        let extractor = FactExtractor::new().unwrap();
        let messages: Vec<RawMessage> = messages
            .iter()
            .map(|t| RawMessage::user(*t, Utc::now()))
            .collect();
        let facts = extractor.extract(&messages);
        let tax = TaxYearConfig::load(None).unwrap();
        let assumptions = PlanningAssumptions::default();
        let ctx = PlanContext::new(&facts, &tax, &assumptions);
        match RetirementPlanner.compute(&ctx).unwrap() {
            GoalPlan::Retirement(p) => p,
            other => panic!("expected retirement plan, got {:?}", other.goal_type()),
        }
    }

    #[test]
    fn test_retirement_age_from_goal() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent and bills",
            "I want to retire at 60",
        ]);
        assert_eq!(plan.retirement_age, 60);
        assert_eq!(plan.years_to_retirement, 25);
    }

    #[test]
    fn test_retirement_age_defaults_to_67() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent and bills",
        ]);
        assert_eq!(plan.retirement_age, 67);
    }

    #[test]
    fn test_duration_timeframe_added_to_current_age() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent",
            "My plan is to retire in 20 years",
        ]);
        // Assumed current age 35 + 20
        assert_eq!(plan.retirement_age, 55);
    }

    #[test]
    fn test_pot_arithmetic() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent",
            "I want to retire at 65",
        ]);
        // Pot funds the private share of target income under the 4% rule
        let private_share = plan.target_annual_income - plan.state_pension_annual;
        assert!((plan.required_pot - private_share / 0.04).abs() < 0.01);
        assert_eq!(plan.existing_pension, 0.0);
        assert_eq!(plan.pot_shortfall, plan.required_pot);
    }

    #[test]
    fn test_existing_pension_reduces_shortfall() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent",
            "My pension pot is worth £100,000",
            "I want to retire at 65",
        ]);
        assert_eq!(plan.existing_pension, 100000.0);
        assert!((plan.pot_shortfall - (plan.required_pot - 100000.0)).abs() < 0.01);
    }

    #[test]
    fn test_recommended_clamped_to_surplus() {
        // Low income, short horizon: required far exceeds surplus
        let plan = plan_for(&[
            "I earn £22,000 per year",
            "I spend £1,300 a month on rent and food",
            "I want to retire at 40",
        ]);
        assert!(!plan.on_track);
        assert!(plan.required_monthly_contribution > plan.recommended_monthly_contribution);
    }

    #[test]
    fn test_projections_present() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent",
        ]);
        assert_eq!(plan.projections.len(), 4);
        assert_eq!(plan.projections[0].years, 5);
        assert_eq!(plan.projections[3].years, 20);
    }
}

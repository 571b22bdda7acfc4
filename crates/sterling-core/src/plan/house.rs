//! House purchase planner
//!
//! Sizes the purchase from goal facts (or documented defaults), checks it
//! against mortgage capacity, lays out deposit options with stamp duty under
//! both schedules, and produces the monthly savings plan that closes the
//! deposit gap over the purchase horizon.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{AssetKind, GoalCategory, GoalType, Projection, TimeUnit};

use super::{GoalPlan, PlanContext, Planner};

/// Goal amounts below this are treated as noise, not a house price
const MIN_PLAUSIBLE_PRICE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositOption {
    /// Deposit share of the purchase price (0.05 = 5%)
    pub percent: f64,
    pub amount: f64,
    pub loan_required: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePurchasePlan {
    pub summary: String,
    pub target_price: f64,
    pub timeframe_years: u32,
    /// Borrowing capacity at the lender income multiple
    pub max_mortgage: f64,
    pub deposit_options: Vec<DepositOption>,
    pub stamp_duty_standard: f64,
    pub stamp_duty_first_time_buyer: f64,
    /// Deposit the savings plan aims for
    pub target_deposit: f64,
    pub existing_savings: f64,
    pub deposit_gap: f64,
    pub required_monthly_savings: f64,
    pub affordable: bool,
    pub projections: Vec<Projection>,
}

pub struct HousePurchasePlanner;

impl HousePurchasePlanner {
    /// Target price and horizon from the first house goal, else defaults
    fn target_from_goals(ctx: &PlanContext<'_>) -> (f64, u32) {
        let mut price = None;
        let mut years = None;
        for goal in &ctx.facts.goals {
            if !goal.categories.contains(&GoalCategory::House) {
                continue;
            }
            if price.is_none() {
                price = goal
                    .amounts
                    .iter()
                    .copied()
                    .find(|a| *a >= MIN_PLAUSIBLE_PRICE);
            }
            if years.is_none() {
                years = goal
                    .timeframes
                    .iter()
                    .find(|t| t.unit == TimeUnit::Years)
                    .map(|t| t.value);
            }
            if price.is_some() && years.is_some() {
                break;
            }
        }
        (
            price.unwrap_or(ctx.assumptions.default_house_price),
            years.unwrap_or(ctx.assumptions.default_house_timeframe_years),
        )
    }

    /// Compute the typed plan; shared with the comprehensive planner
    pub fn build(ctx: &PlanContext<'_>) -> HousePurchasePlan {
        let assumptions = ctx.assumptions;
        let income = ctx.income();
        let expenses = ctx.expenses();
        let surplus = (income.monthly_net - expenses.monthly_total).max(0.0);

        let (target_price, timeframe_years) = Self::target_from_goals(ctx);
        let max_mortgage = income.annual_gross * assumptions.mortgage_income_multiple;

        let deposit_options = assumptions
            .deposit_tiers
            .iter()
            .map(|&percent| {
                let amount = target_price * percent;
                DepositOption {
                    percent,
                    amount,
                    loan_required: target_price - amount,
                }
            })
            .collect();

        let stamp_duty_standard = ctx.tax.stamp_duty(target_price, false);
        let stamp_duty_first_time_buyer = ctx.tax.stamp_duty(target_price, true);

        let target_deposit = target_price * assumptions.target_deposit_rate;
        let existing_savings = ctx.facts.asset_total(AssetKind::Savings);
        let deposit_gap = (target_deposit - existing_savings).max(0.0);

        // Deposit savings are held as cash, so no growth assumption
        let months = (timeframe_years * 12).max(1) as f64;
        let required_monthly_savings = deposit_gap / months;

        let affordable = max_mortgage + target_deposit >= target_price
            && required_monthly_savings <= surplus;

        debug!(
            target_price,
            max_mortgage, deposit_gap, required_monthly_savings, "House plan computed"
        );

        let projections = vec![Projection {
            years: timeframe_years,
            projected_value: existing_savings + required_monthly_savings * months,
            total_contributions: required_monthly_savings * months,
            investment_growth: 0.0,
        }];

        let summary = format!(
            "A £{:.0} purchase in {} years needs a £{:.0} deposit; saving £{:.0}/month gets there",
            target_price, timeframe_years, target_deposit, required_monthly_savings
        );

        HousePurchasePlan {
            summary,
            target_price,
            timeframe_years,
            max_mortgage,
            deposit_options,
            stamp_duty_standard,
            stamp_duty_first_time_buyer,
            target_deposit,
            existing_savings,
            deposit_gap,
            required_monthly_savings,
            affordable,
            projections,
        }
    }
}

impl Planner for HousePurchasePlanner {
    fn goal_type(&self) -> GoalType {
        GoalType::HousePurchase
    }

    fn name(&self) -> &'static str {
        "House purchase"
    }

    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan> {
        Ok(GoalPlan::HousePurchase(Self::build(ctx)))
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

    fn plan_for(messages: &[&str]) -> HousePurchasePlan {
        let extractor = FactExtractor::new().unwrap();
        let messages: Vec<RawMessage> = messages
            .iter()
            .map(|t| RawMessage::user(*t, Utc::now()))
            .collect();
        let facts = extractor.extract(&messages);
        let tax = TaxYearConfig::load(None).unwrap();
        let assumptions = PlanningAssumptions::default();
        let ctx = PlanContext::new(&facts, &tax, &assumptions);
        match HousePurchasePlanner.compute(&ctx).unwrap() {
            GoalPlan::HousePurchase(p) => p,
            other => panic!("expected house plan, got {:?}", other.goal_type()),
        }
    }

    #[test]
    fn test_defaults_without_house_goal() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent",
        ]);
        assert_eq!(plan.target_price, 300000.0);
        assert_eq!(plan.timeframe_years, 5);
    }

    #[test]
    fn test_price_and_timeframe_from_goal() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent",
            "I want to buy a £400,000 house in 3 years",
        ]);
        assert_eq!(plan.target_price, 400000.0);
        assert_eq!(plan.timeframe_years, 3);
    }

    #[test]
    fn test_mortgage_capacity() {
        let plan = plan_for(&[
            "I earn £60,000 per year",
            "I spend £1,500 a month on rent",
        ]);
        assert_eq!(plan.max_mortgage, 270000.0);
    }

    #[test]
    fn test_deposit_options() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent",
        ]);
        assert_eq!(plan.deposit_options.len(), 3);
        assert_eq!(plan.deposit_options[0].amount, 15000.0);
        assert_eq!(plan.deposit_options[1].amount, 45000.0);
        assert_eq!(plan.deposit_options[2].amount, 60000.0);
        assert_eq!(plan.deposit_options[2].loan_required, 240000.0);
    }

    #[test]
    fn test_stamp_duty_both_schedules() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent",
            "I want to buy a £500,000 house",
        ]);
        // Standard: (500k - 250k) * 5%; FTB: (500k - 425k) * 5%
        assert!((plan.stamp_duty_standard - 12500.0).abs() < 0.01);
        assert!((plan.stamp_duty_first_time_buyer - 3750.0).abs() < 0.01);
    }

    #[test]
    fn test_savings_reduce_deposit_gap() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent",
            "I have £20,000 in savings",
        ]);
        assert_eq!(plan.existing_savings, 20000.0);
        assert_eq!(plan.target_deposit, 45000.0);
        assert_eq!(plan.deposit_gap, 25000.0);
        assert!((plan.required_monthly_savings - 25000.0 / 60.0).abs() < 0.01);
    }
}

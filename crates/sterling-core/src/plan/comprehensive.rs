//! Comprehensive planner
//!
//! Composes the retirement, house, investment, and protection plans and
//! orders the classic next steps: emergency fund, employer pension match,
//! high-interest debt, protection, extra pension contributions. Steps with
//! nothing to do are filtered out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{DebtKind, GoalType};

use super::house::{HousePurchasePlan, HousePurchasePlanner};
use super::investment::{InvestmentPlan, InvestmentPlanner};
use super::protection::{ProtectionPlan, ProtectionPlanner};
use super::retirement::{RetirementPlan, RetirementPlanner};
use super::{GoalPlan, PlanContext, Planner};

/// Months over which high-interest debt is paid down in the suggestion
const DEBT_PAYDOWN_MONTHS: f64 = 24.0;

/// Suggested employer-match pension contribution as a share of gross pay
const PENSION_MATCH_SHARE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    /// 1-based position after filtering
    pub rank: u32,
    pub name: String,
    pub description: String,
    pub monthly_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensivePlan {
    pub summary: String,
    pub retirement: RetirementPlan,
    pub house: HousePurchasePlan,
    pub investment: InvestmentPlan,
    pub protection: ProtectionPlan,
    pub priorities: Vec<PriorityItem>,
}

pub struct ComprehensivePlanner;

impl ComprehensivePlanner {
    pub fn build(ctx: &PlanContext<'_>) -> ComprehensivePlan {
        let retirement = RetirementPlanner::build(ctx);
        let house = HousePurchasePlanner::build(ctx);
        let investment = InvestmentPlanner::build(ctx);
        let protection = ProtectionPlanner::build(ctx);

        let income = ctx.income();
        let non_mortgage_debt: f64 = ctx
            .facts
            .debts
            .iter()
            .filter(|d| d.kind != DebtKind::Mortgage)
            .map(|d| d.primary_amount())
            .sum();

        // Fixed ordering; zero-target steps drop out.
        let candidates = [
            (
                "Emergency fund",
                format!(
                    "Build {:.0} months of expenses (£{:.0}) in easy-access savings",
                    ctx.assumptions.emergency_fund_months, investment.emergency_fund_target
                ),
                investment.monthly_emergency_reserve,
                investment.emergency_fund_gap > 0.0,
            ),
            (
                "Employer pension match",
                "Contribute at least enough to capture any employer match".to_string(),
                income.monthly_gross * PENSION_MATCH_SHARE,
                income.monthly_gross > 0.0,
            ),
            (
                "High-interest debt",
                format!("Clear £{:.0} of non-mortgage debt", non_mortgage_debt),
                non_mortgage_debt / DEBT_PAYDOWN_MONTHS,
                non_mortgage_debt > 0.0,
            ),
            (
                "Protection",
                "Put life and income cover in place".to_string(),
                protection.total_premium_monthly,
                protection.total_premium_monthly > 0.0,
            ),
            (
                "Extra pension contributions",
                format!(
                    "Close the £{:.0} pension shortfall",
                    retirement.pot_shortfall
                ),
                retirement.recommended_monthly_contribution,
                retirement.pot_shortfall > 0.0,
            ),
        ];

        let priorities: Vec<PriorityItem> = candidates
            .into_iter()
            .filter(|(_, _, _, keep)| *keep)
            .enumerate()
            .map(|(i, (name, description, monthly_amount, _))| PriorityItem {
                rank: i as u32 + 1,
                name: name.to_string(),
                description,
                monthly_amount,
            })
            .collect();

        debug!(priorities = priorities.len(), "Comprehensive plan computed");

        let summary = format!(
            "Full plan across retirement, house, investment and protection with {} priority steps",
            priorities.len()
        );

        ComprehensivePlan {
            summary,
            retirement,
            house,
            investment,
            protection,
            priorities,
        }
    }
}

impl Planner for ComprehensivePlanner {
    fn goal_type(&self) -> GoalType {
        GoalType::Comprehensive
    }

    fn name(&self) -> &'static str {
        "Comprehensive"
    }

    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan> {
        Ok(GoalPlan::Comprehensive(Self::build(ctx)))
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

    fn plan_for(messages: &[&str]) -> ComprehensivePlan {
        let extractor = FactExtractor::new().unwrap();
        let messages: Vec<RawMessage> = messages
            .iter()
            .map(|t| RawMessage::user(*t, Utc::now()))
            .collect();
        let facts = extractor.extract(&messages);
        let tax = TaxYearConfig::load(None).unwrap();
        let assumptions = PlanningAssumptions::default();
        let ctx = PlanContext::new(&facts, &tax, &assumptions);
        ComprehensivePlanner::build(&ctx)
    }

    #[test]
    fn test_composes_all_four_plans() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent and bills",
            "I want to retire at 65",
        ]);
        assert_eq!(plan.retirement.retirement_age, 65);
        assert_eq!(plan.house.target_price, 300000.0);
        assert!(plan.protection.life_cover > 0.0);
    }

    #[test]
    fn test_priority_order_and_zero_filtering() {
        // No debts mentioned, so the debt step is filtered out
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent and bills",
        ]);
        let names: Vec<&str> = plan.priorities.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Emergency fund",
                "Employer pension match",
                "Protection",
                "Extra pension contributions"
            ]
        );
        let ranks: Vec<u32> = plan.priorities.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_debt_priority_included_when_debt_present() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,800 a month on rent and bills",
            "I owe £4,800 on my credit card",
        ]);
        let debt = plan
            .priorities
            .iter()
            .find(|p| p.name == "High-interest debt")
            .expect("debt step missing");
        assert_eq!(debt.rank, 3);
        assert!((debt.monthly_amount - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_full_emergency_fund_drops_first_step() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £1,500 a month on rent and bills",
            "I have £20,000 in savings",
        ]);
        assert!(plan
            .priorities
            .iter()
            .all(|p| p.name != "Emergency fund"));
        assert_eq!(plan.priorities[0].name, "Employer pension match");
        assert_eq!(plan.priorities[0].rank, 1);
    }
}

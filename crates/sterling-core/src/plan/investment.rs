//! Investment planner
//!
//! Reserves surplus for any emergency-fund gap first, then maps the stated
//! risk tolerance to an asset allocation and projects the investable stream
//! at the allocation's expected return.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{AssetKind, GoalType, Projection, RiskLevel};

use super::math::build_projections;
use super::retirement::PROJECTION_HORIZONS;
use super::{GoalPlan, PlanContext, Planner};

/// Share of surplus diverted to the emergency fund while a gap remains
const EMERGENCY_RESERVE_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub equities: f64,
    pub bonds: f64,
    pub cash: f64,
}

/// Fixed allocation table keyed by risk level; unknown maps to medium
fn allocation_for(risk: RiskLevel) -> (AssetAllocation, f64) {
    match risk {
        RiskLevel::Low => (
            AssetAllocation {
                equities: 0.20,
                bonds: 0.60,
                cash: 0.20,
            },
            0.03,
        ),
        RiskLevel::High => (
            AssetAllocation {
                equities: 0.80,
                bonds: 0.15,
                cash: 0.05,
            },
            0.07,
        ),
        RiskLevel::Medium | RiskLevel::Unknown => (
            AssetAllocation {
                equities: 0.60,
                bonds: 0.30,
                cash: 0.10,
            },
            0.05,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub summary: String,
    /// Monthly amount available to invest after the emergency reserve
    pub monthly_investable: f64,
    /// Monthly amount set aside for the emergency fund while a gap remains
    pub monthly_emergency_reserve: f64,
    pub emergency_fund_target: f64,
    pub emergency_fund_gap: f64,
    pub risk_level: RiskLevel,
    pub allocation: AssetAllocation,
    pub expected_annual_return: f64,
    /// ISA allowance left after a year of investing at this rate
    pub isa_headroom: f64,
    pub projections: Vec<Projection>,
}

pub struct InvestmentPlanner;

impl InvestmentPlanner {
    /// Compute the typed plan; shared with the comprehensive planner
    pub fn build(ctx: &PlanContext<'_>) -> InvestmentPlan {
        let assumptions = ctx.assumptions;
        let income = ctx.income();
        let expenses = ctx.expenses();
        let surplus = (income.monthly_net - expenses.monthly_total).max(0.0);

        let emergency_fund_target = expenses.monthly_total * assumptions.emergency_fund_months;
        let existing_savings = ctx.facts.asset_total(AssetKind::Savings);
        let emergency_fund_gap = (emergency_fund_target - existing_savings).max(0.0);

        let monthly_emergency_reserve = if emergency_fund_gap > 0.0 {
            surplus * EMERGENCY_RESERVE_SHARE
        } else {
            0.0
        };
        let monthly_investable = (surplus - monthly_emergency_reserve).max(0.0);

        let risk_level = ctx
            .facts
            .risk_tolerance
            .as_ref()
            .map(|r| r.level)
            .unwrap_or(RiskLevel::Unknown);
        let (allocation, expected_annual_return) = allocation_for(risk_level);

        let annual_invested = monthly_investable * 12.0;
        let isa_headroom = (ctx.tax.allowances.isa_annual - annual_invested).max(0.0);

        debug!(
            monthly_investable,
            emergency_fund_gap,
            risk = risk_level.as_str(),
            "Investment plan computed"
        );

        let projections = build_projections(
            monthly_investable,
            0.0,
            expected_annual_return,
            &PROJECTION_HORIZONS,
        );

        let summary = format!(
            "Investing £{:.0}/month in a {} allocation could reach £{:.0} in 20 years",
            monthly_investable,
            risk_level,
            projections.last().map(|p| p.projected_value).unwrap_or(0.0)
        );

        InvestmentPlan {
            summary,
            monthly_investable,
            monthly_emergency_reserve,
            emergency_fund_target,
            emergency_fund_gap,
            risk_level,
            allocation,
            expected_annual_return,
            isa_headroom,
            projections,
        }
    }
}

impl Planner for InvestmentPlanner {
    fn goal_type(&self) -> GoalType {
        GoalType::Investment
    }

    fn name(&self) -> &'static str {
        "Investment"
    }

    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan> {
        Ok(GoalPlan::Investment(Self::build(ctx)))
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

    fn plan_for(messages: &[&str]) -> InvestmentPlan {
        let extractor = FactExtractor::new().unwrap();
        let messages: Vec<RawMessage> = messages
            .iter()
            .map(|t| RawMessage::user(*t, Utc::now()))
            .collect();
        let facts = extractor.extract(&messages);
        let tax = TaxYearConfig::load(None).unwrap();
        let assumptions = PlanningAssumptions::default();
        let ctx = PlanContext::new(&facts, &tax, &assumptions);
        match InvestmentPlanner.compute(&ctx).unwrap() {
            GoalPlan::Investment(p) => p,
            other => panic!("expected investment plan, got {:?}", other.goal_type()),
        }
    }

    #[test]
    fn test_emergency_gap_reserves_half_of_surplus() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent and bills",
        ]);
        assert_eq!(plan.emergency_fund_target, 12000.0);
        assert_eq!(plan.emergency_fund_gap, 12000.0);
        assert!(plan.monthly_emergency_reserve > 0.0);
        assert!(
            (plan.monthly_investable - plan.monthly_emergency_reserve).abs() < 1e-9,
            "half the surplus should be reserved"
        );
    }

    #[test]
    fn test_full_emergency_fund_frees_surplus() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent and bills",
            "I have £15,000 in savings",
        ]);
        assert_eq!(plan.emergency_fund_gap, 0.0);
        assert_eq!(plan.monthly_emergency_reserve, 0.0);
    }

    #[test]
    fn test_risk_maps_to_allocation() {
        let aggressive = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent",
            "I'm comfortable with aggressive investments",
        ]);
        assert_eq!(aggressive.risk_level, RiskLevel::High);
        assert_eq!(aggressive.allocation.equities, 0.80);
        assert_eq!(aggressive.expected_annual_return, 0.07);

        let cautious = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent",
            "I prefer safe investments",
        ]);
        assert_eq!(cautious.risk_level, RiskLevel::Low);
        assert_eq!(cautious.allocation.bonds, 0.60);
    }

    #[test]
    fn test_unknown_risk_treated_as_medium() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent",
        ]);
        assert_eq!(plan.risk_level, RiskLevel::Unknown);
        assert_eq!(plan.allocation.equities, 0.60);
        assert_eq!(plan.expected_annual_return, 0.05);
    }

    #[test]
    fn test_projection_horizons() {
        let plan = plan_for(&[
            "I earn £55,000 per year",
            "I spend £2,000 a month on rent",
        ]);
        let years: Vec<u32> = plan.projections.iter().map(|p| p.years).collect();
        assert_eq!(years, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_allocation_shares_sum_to_one() {
        for risk in [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Unknown,
        ] {
            let (allocation, _) = allocation_for(risk);
            let total = allocation.equities + allocation.bonds + allocation.cash;
            assert!((total - 1.0).abs() < 1e-9);
        }
    }
}

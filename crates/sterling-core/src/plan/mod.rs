//! Goal planners
//!
//! Each planner is a pure calculator over extracted facts: it normalizes
//! income and expenses, applies the tax-year constants, and produces a
//! structured plan with affordability metrics and multi-year projections.
//!
//! Planners are registered in a [`PlannerRegistry`] and dispatched on the
//! closed [`GoalType`] enum. The registry validates that income and expense
//! facts are present before any planner runs; planners themselves never
//! fail on missing optional data, they substitute documented defaults.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sterling_core::plan::{generate_financial_plan, PlanningAssumptions};
//!
//! let response = generate_financial_plan(GoalType::Retirement, &facts, &tax);
//! if response.success {
//!     println!("{}", response.plan.unwrap().summary());
//! }
//! ```

pub mod comprehensive;
pub mod house;
pub mod investment;
pub mod math;
pub mod protection;
pub mod retirement;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{FinancialFacts, GoalType, NormalizedExpenses, NormalizedIncome};
use crate::normalize::{normalize_expenses, normalize_income};
use crate::tax::TaxYearConfig;

pub use comprehensive::{ComprehensivePlan, ComprehensivePlanner, PriorityItem};
pub use house::{DepositOption, HousePurchasePlan, HousePurchasePlanner};
pub use investment::{AssetAllocation, InvestmentPlan, InvestmentPlanner};
pub use protection::{ProtectionPlan, ProtectionPlanner};
pub use retirement::{RetirementPlan, RetirementPlanner};

/// Tunable planning heuristics.
///
/// These are assumptions, not tax law: they live here rather than in
/// [`TaxYearConfig`] so callers can adjust them per conversation (for
/// example when the user's age is actually known).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningAssumptions {
    /// Assumed age when the conversation never states one
    pub current_age: u32,
    /// Retirement age used when no goal mentions one
    pub default_retirement_age: u32,
    /// Expected annual investment growth for pension/deposit projections
    pub growth_rate: f64,
    /// Sustainable pot withdrawal rate (the 4% rule)
    pub withdrawal_rate: f64,
    /// Share of current net income needed in retirement
    pub income_replacement: f64,
    /// Lender income multiple for mortgage capacity
    pub mortgage_income_multiple: f64,
    /// Months of expenses held back as an emergency fund
    pub emergency_fund_months: f64,
    /// House price used when no house goal states one
    pub default_house_price: f64,
    /// Purchase horizon used when no house goal states one
    pub default_house_timeframe_years: u32,
    /// Deposit percentages shown as options
    pub deposit_tiers: [f64; 3],
    /// Deposit percentage the savings plan targets
    pub target_deposit_rate: f64,
    /// Life cover as a multiple of gross annual income
    pub life_cover_multiple: f64,
    /// Income protection as a share of gross monthly income
    pub income_protection_rate: f64,
    /// Critical illness cover as a multiple of gross annual income
    pub critical_illness_multiple: f64,
}

impl Default for PlanningAssumptions {
    fn default() -> Self {
        Self {
            current_age: 35,
            default_retirement_age: 67,
            growth_rate: 0.05,
            withdrawal_rate: 0.04,
            income_replacement: 0.70,
            mortgage_income_multiple: 4.5,
            emergency_fund_months: 6.0,
            default_house_price: 300_000.0,
            default_house_timeframe_years: 5,
            deposit_tiers: [0.05, 0.15, 0.20],
            target_deposit_rate: 0.15,
            life_cover_multiple: 10.0,
            income_protection_rate: 0.65,
            critical_illness_multiple: 4.0,
        }
    }
}

/// Context provided to planners: the facts plus tax constants and
/// assumptions. Normalization helpers recompute on every call; nothing is
/// cached, so the context is freely shareable.
pub struct PlanContext<'a> {
    pub facts: &'a FinancialFacts,
    pub tax: &'a TaxYearConfig,
    pub assumptions: &'a PlanningAssumptions,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        facts: &'a FinancialFacts,
        tax: &'a TaxYearConfig,
        assumptions: &'a PlanningAssumptions,
    ) -> Self {
        Self {
            facts,
            tax,
            assumptions,
        }
    }

    pub fn income(&self) -> NormalizedIncome {
        normalize_income(&self.facts.income, self.tax)
    }

    pub fn expenses(&self) -> NormalizedExpenses {
        normalize_expenses(&self.facts.expenses)
    }

    /// Monthly net income minus monthly expenses; may be negative
    pub fn monthly_surplus(&self) -> f64 {
        self.income().monthly_net - self.expenses().monthly_total
    }
}

/// Trait for goal planners
pub trait Planner: Send + Sync {
    /// The goal type this planner handles
    fn goal_type(&self) -> GoalType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Compute a plan from the context
    fn compute(&self, ctx: &PlanContext<'_>) -> Result<GoalPlan>;
}

/// A computed plan, tagged by goal type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goal_type", rename_all = "snake_case")]
pub enum GoalPlan {
    Retirement(RetirementPlan),
    HousePurchase(HousePurchasePlan),
    Investment(InvestmentPlan),
    Protection(ProtectionPlan),
    Comprehensive(ComprehensivePlan),
}

impl GoalPlan {
    pub fn goal_type(&self) -> GoalType {
        match self {
            Self::Retirement(_) => GoalType::Retirement,
            Self::HousePurchase(_) => GoalType::HousePurchase,
            Self::Investment(_) => GoalType::Investment,
            Self::Protection(_) => GoalType::Protection,
            Self::Comprehensive(_) => GoalType::Comprehensive,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            Self::Retirement(p) => &p.summary,
            Self::HousePurchase(p) => &p.summary,
            Self::Investment(p) => &p.summary,
            Self::Protection(p) => &p.summary,
            Self::Comprehensive(p) => &p.summary,
        }
    }
}

/// Result of a plan request: either a plan or user-facing validation errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<GoalPlan>,
    pub errors: Vec<String>,
}

impl PlanResponse {
    pub fn ok(plan: GoalPlan) -> Self {
        Self {
            success: true,
            plan: Some(plan),
            errors: vec![],
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            success: false,
            plan: None,
            errors,
        }
    }
}

/// Check that a plan can be computed from the facts at all.
///
/// Returns user-facing guidance strings, empty when valid.
pub fn validate_facts(facts: &FinancialFacts) -> Vec<String> {
    let mut errors = Vec::new();
    if facts.income.is_empty() {
        errors.push("No income information found. Tell me what you earn first.".to_string());
    }
    if facts.expenses.is_empty() {
        errors.push(
            "No expense information found. Tell me about your monthly spending first.".to_string(),
        );
    }
    errors
}

/// Registry of goal planners, dispatched on [`GoalType`]
pub struct PlannerRegistry {
    planners: Vec<Box<dyn Planner>>,
    assumptions: PlanningAssumptions,
}

impl Default for PlannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerRegistry {
    /// Create a registry with the built-in planners and default assumptions
    pub fn new() -> Self {
        Self::with_assumptions(PlanningAssumptions::default())
    }

    pub fn with_assumptions(assumptions: PlanningAssumptions) -> Self {
        let mut registry = Self {
            planners: vec![],
            assumptions,
        };
        registry.register(Box::new(RetirementPlanner));
        registry.register(Box::new(HousePurchasePlanner));
        registry.register(Box::new(InvestmentPlanner));
        registry.register(Box::new(ProtectionPlanner));
        registry.register(Box::new(ComprehensivePlanner));
        registry
    }

    /// Register a planner
    pub fn register(&mut self, planner: Box<dyn Planner>) {
        self.planners.push(planner);
    }

    /// Goal types with a registered planner
    pub fn goal_types(&self) -> Vec<GoalType> {
        self.planners.iter().map(|p| p.goal_type()).collect()
    }

    /// Validate the facts and compute a plan for the requested goal type
    pub fn plan(
        &self,
        goal_type: GoalType,
        facts: &FinancialFacts,
        tax: &TaxYearConfig,
    ) -> PlanResponse {
        let errors = validate_facts(facts);
        if !errors.is_empty() {
            warn!(goal = goal_type.as_str(), ?errors, "Plan request rejected");
            return PlanResponse::invalid(errors);
        }

        let ctx = PlanContext::new(facts, tax, &self.assumptions);
        match self.planners.iter().find(|p| p.goal_type() == goal_type) {
            Some(planner) => {
                debug!(planner = planner.name(), "Computing plan");
                match planner.compute(&ctx) {
                    Ok(plan) => PlanResponse::ok(plan),
                    Err(e) => PlanResponse::invalid(vec![e.to_string()]),
                }
            }
            None => PlanResponse::invalid(vec![format!(
                "No planner registered for goal type '{}'",
                goal_type
            )]),
        }
    }
}

/// Top-level entry point: validate facts and produce a plan with default
/// assumptions.
pub fn generate_financial_plan(
    goal_type: GoalType,
    facts: &FinancialFacts,
    tax: &TaxYearConfig,
) -> PlanResponse {
    PlannerRegistry::new().plan(goal_type, facts, tax)
}

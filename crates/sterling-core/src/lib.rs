//! Sterling Core Library
//!
//! Shared functionality for the Sterling financial planning engine:
//! - Fact extraction from free-text conversation messages
//! - Income/expense normalization with UK income tax and NI
//! - Versioned tax-year configuration (allowances, bands, stamp duty)
//! - Goal planners for retirement, house purchase, investment, protection
//! - Financial-health scoring with derived insights and action items
//!
//! All computation is synchronous and side-effect-free: the same facts
//! always produce the same plan.

pub mod advice;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod plan;
pub mod tax;

pub use advice::{
    assess_financial_health, generate_action_items, generate_plan_insights, ActionItem,
    FinancialHealth, HealthStatus, Insight, InsightKind, Priority,
};
pub use error::{Error, Result};
pub use extract::{calculate_completion_score, generate_insights, FactExtractor};
pub use models::{
    FinancialFacts, Frequency, GoalType, NormalizedExpenses, NormalizedIncome, RawMessage,
    RiskLevel, Role, TaxAssessment,
};
pub use normalize::{convert_to_annual, convert_to_monthly, normalize_expenses, normalize_income};
pub use plan::{
    generate_financial_plan, GoalPlan, PlanContext, PlanResponse, Planner, PlannerRegistry,
    PlanningAssumptions,
};
pub use tax::TaxYearConfig;

//! Insight and action generation
//!
//! Pure views over extracted facts and computed plans: a composite
//! financial-health score, human-readable insights, and prioritized action
//! items with a fixed timeframe vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::FinancialFacts;
use crate::normalize::{normalize_expenses, normalize_income};
use crate::plan::GoalPlan;
use crate::tax::TaxYearConfig;

/// Tone of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Something is going well
    Positive,
    /// Worth attention but not urgent
    Warning,
    /// Requires prompt attention
    Alert,
    /// Neutral observation
    Info,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::Alert => "alert",
            Self::Info => "info",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Alert => 4,
            Self::Warning => 3,
            Self::Positive => 2,
            Self::Info => 1,
        }
    }
}

/// A derived observation shown alongside a plan or extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: String,
    pub message: String,
}

/// Action priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A concrete next step with a suggested timeframe.
///
/// Timeframes come from a fixed vocabulary: "1 week", "2 weeks",
/// "1 month", "1-3 months".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub category: String,
    pub action: String,
    pub description: String,
    pub timeframe: String,
}

/// Overall financial standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Composite 0-100 health score with its inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealth {
    pub score: u8,
    pub monthly_surplus: f64,
    /// Surplus as a percentage of net monthly income; negative when
    /// spending exceeds income
    pub savings_rate: f64,
    /// Total debt as a percentage of gross annual income
    pub debt_to_income: f64,
    pub status: HealthStatus,
}

/// Score financial health from surplus, savings rate, and debt ratio.
///
/// Surplus contributes up to 40 points, savings rate up to 30, and a
/// clean debt position up to 30.
pub fn assess_financial_health(facts: &FinancialFacts, tax: &TaxYearConfig) -> FinancialHealth {
    let income = normalize_income(&facts.income, tax);
    let expenses = normalize_expenses(&facts.expenses);

    let monthly_surplus = income.monthly_net - expenses.monthly_total;
    let savings_rate = if income.monthly_net > 0.0 {
        monthly_surplus / income.monthly_net * 100.0
    } else {
        0.0
    };
    let debt_to_income = if income.annual_gross > 0.0 {
        facts.debt_total() / income.annual_gross * 100.0
    } else {
        0.0
    };

    let surplus_points = if monthly_surplus <= 0.0 {
        0
    } else if monthly_surplus < 250.0 {
        15
    } else if monthly_surplus < 1000.0 {
        30
    } else {
        40
    };
    let rate_points = if savings_rate >= 20.0 {
        30
    } else if savings_rate >= 10.0 {
        20
    } else if savings_rate > 0.0 {
        10
    } else {
        0
    };
    let debt_points = if debt_to_income == 0.0 {
        30
    } else if debt_to_income < 50.0 {
        20
    } else if debt_to_income < 100.0 {
        10
    } else {
        0
    };

    let score = (surplus_points + rate_points + debt_points).min(100) as u8;
    let status = if score >= 80 {
        HealthStatus::Excellent
    } else if score >= 60 {
        HealthStatus::Good
    } else if score >= 40 {
        HealthStatus::Fair
    } else {
        HealthStatus::Poor
    };

    FinancialHealth {
        score,
        monthly_surplus,
        savings_rate,
        debt_to_income,
        status,
    }
}

/// Derive insights from a computed plan and the health snapshot.
///
/// Savings-rate thresholds drive the general messages; each goal type adds
/// its own affordability insight. Results are ordered most urgent first.
pub fn generate_plan_insights(plan: &GoalPlan, health: &FinancialHealth) -> Vec<Insight> {
    let mut insights = Vec::new();

    if health.monthly_surplus <= 0.0 {
        insights.push(Insight {
            kind: InsightKind::Alert,
            category: "cashflow".to_string(),
            message: "You're spending as much as you earn; there is nothing left to put towards this goal yet".to_string(),
        });
    } else if health.savings_rate > 20.0 {
        insights.push(Insight {
            kind: InsightKind::Positive,
            category: "cashflow".to_string(),
            message: format!(
                "Strong savings rate of {:.0}% gives you room to work with",
                health.savings_rate
            ),
        });
    } else if health.savings_rate < 10.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: "cashflow".to_string(),
            message: format!(
                "Savings rate of {:.0}% is on the low side; small spending cuts would compound",
                health.savings_rate
            ),
        });
    }

    match plan {
        GoalPlan::Retirement(p) => {
            if p.on_track {
                insights.push(Insight {
                    kind: InsightKind::Positive,
                    category: "retirement".to_string(),
                    message: format!(
                        "The £{:.0}/month needed for retiring at {} fits within your surplus",
                        p.required_monthly_contribution, p.retirement_age
                    ),
                });
            } else {
                insights.push(Insight {
                    kind: InsightKind::Warning,
                    category: "retirement".to_string(),
                    message: format!(
                        "Retiring at {} needs £{:.0}/month but only £{:.0}/month is affordable today",
                        p.retirement_age,
                        p.required_monthly_contribution,
                        p.recommended_monthly_contribution
                    ),
                });
            }
        }
        GoalPlan::HousePurchase(p) => {
            let kind = if p.affordable {
                InsightKind::Positive
            } else {
                InsightKind::Warning
            };
            insights.push(Insight {
                kind,
                category: "house".to_string(),
                message: format!(
                    "A £{:.0} purchase needs £{:.0}/month of deposit savings over {} years",
                    p.target_price, p.required_monthly_savings, p.timeframe_years
                ),
            });
            insights.push(Insight {
                kind: InsightKind::Info,
                category: "house".to_string(),
                message: format!(
                    "Stamp duty would be £{:.0}, or £{:.0} with first-time-buyer relief",
                    p.stamp_duty_standard, p.stamp_duty_first_time_buyer
                ),
            });
        }
        GoalPlan::Investment(p) => {
            if p.emergency_fund_gap > 0.0 {
                insights.push(Insight {
                    kind: InsightKind::Warning,
                    category: "investment".to_string(),
                    message: format!(
                        "Your emergency fund is £{:.0} short; part of the surplus is reserved for it first",
                        p.emergency_fund_gap
                    ),
                });
            }
            insights.push(Insight {
                kind: InsightKind::Info,
                category: "investment".to_string(),
                message: format!(
                    "A {} risk profile suggests {:.0}% equities / {:.0}% bonds / {:.0}% cash",
                    p.risk_level,
                    p.allocation.equities * 100.0,
                    p.allocation.bonds * 100.0,
                    p.allocation.cash * 100.0
                ),
            });
        }
        GoalPlan::Protection(p) => {
            insights.push(Insight {
                kind: InsightKind::Info,
                category: "protection".to_string(),
                message: format!(
                    "£{:.0} life cover and £{:.0}/month income protection would cost about £{:.0}/month",
                    p.life_cover, p.income_protection_monthly, p.total_premium_monthly
                ),
            });
        }
        GoalPlan::Comprehensive(p) => {
            if let Some(first) = p.priorities.first() {
                insights.push(Insight {
                    kind: InsightKind::Info,
                    category: "priorities".to_string(),
                    message: format!("Start with: {}. {}", first.name, first.description),
                });
            }
        }
    }

    insights.sort_by(|a, b| b.kind.priority().cmp(&a.kind.priority()));
    insights
}

/// Derive prioritized action items from a computed plan and the health
/// snapshot, ordered high priority first.
pub fn generate_action_items(plan: &GoalPlan, health: &FinancialHealth) -> Vec<ActionItem> {
    let mut actions = Vec::new();

    if health.monthly_surplus <= 0.0 {
        actions.push(ActionItem {
            priority: Priority::High,
            category: "budget".to_string(),
            action: "Review monthly spending".to_string(),
            description: "Expenses currently absorb all of your income; find cuts before committing to a goal".to_string(),
            timeframe: "1 week".to_string(),
        });
    }

    match plan {
        GoalPlan::Retirement(p) => {
            if p.on_track {
                actions.push(ActionItem {
                    priority: Priority::Medium,
                    category: "pension".to_string(),
                    action: format!(
                        "Set up a £{:.0}/month pension contribution",
                        p.recommended_monthly_contribution
                    ),
                    description: format!(
                        "Closes the £{:.0} pot shortfall by age {}",
                        p.pot_shortfall, p.retirement_age
                    ),
                    timeframe: "1 month".to_string(),
                });
            } else {
                actions.push(ActionItem {
                    priority: Priority::High,
                    category: "pension".to_string(),
                    action: "Increase pension contributions".to_string(),
                    description: format!(
                        "£{:.0}/month is needed; start with the affordable £{:.0}/month and review yearly",
                        p.required_monthly_contribution, p.recommended_monthly_contribution
                    ),
                    timeframe: "1 month".to_string(),
                });
            }
        }
        GoalPlan::HousePurchase(p) => {
            actions.push(ActionItem {
                priority: Priority::Medium,
                category: "savings".to_string(),
                action: format!(
                    "Automate £{:.0}/month into deposit savings",
                    p.required_monthly_savings
                ),
                description: format!(
                    "Reaches the £{:.0} deposit in {} years",
                    p.target_deposit, p.timeframe_years
                ),
                timeframe: "2 weeks".to_string(),
            });
        }
        GoalPlan::Investment(p) => {
            if p.emergency_fund_gap > 0.0 {
                actions.push(ActionItem {
                    priority: Priority::High,
                    category: "emergency-fund".to_string(),
                    action: "Top up your emergency fund".to_string(),
                    description: format!(
                        "£{:.0} short of the £{:.0} target",
                        p.emergency_fund_gap, p.emergency_fund_target
                    ),
                    timeframe: "1 month".to_string(),
                });
            }
            if p.monthly_investable > 0.0 {
                actions.push(ActionItem {
                    priority: Priority::Medium,
                    category: "investing".to_string(),
                    action: format!(
                        "Invest £{:.0}/month in a stocks & shares ISA",
                        p.monthly_investable
                    ),
                    description: format!(
                        "£{:.0} of this year's ISA allowance would remain",
                        p.isa_headroom
                    ),
                    timeframe: "1-3 months".to_string(),
                });
            }
        }
        GoalPlan::Protection(p) => {
            actions.push(ActionItem {
                priority: Priority::Medium,
                category: "protection".to_string(),
                action: "Get life and income protection quotes".to_string(),
                description: format!(
                    "Budget around £{:.0}/month for the recommended cover",
                    p.total_premium_monthly
                ),
                timeframe: "1-3 months".to_string(),
            });
        }
        GoalPlan::Comprehensive(p) => {
            for item in p.priorities.iter().take(3) {
                actions.push(ActionItem {
                    priority: if item.rank == 1 {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                    category: "priorities".to_string(),
                    action: item.name.clone(),
                    description: item.description.clone(),
                    timeframe: match item.rank {
                        1 => "2 weeks".to_string(),
                        2 => "1 month".to_string(),
                        _ => "1-3 months".to_string(),
                    },
                });
            }
        }
    }

    actions.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    actions
}

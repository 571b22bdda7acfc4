//! Fact extraction engine
//!
//! Turns free-text conversation messages into typed financial facts using
//! declarative keyword rule tables plus regex scanners for amounts and
//! timeframes. Classification is intentionally permissive: a single message
//! may land in several buckets (a statement about rent is both an expense
//! and, with "save for a house", part of a goal).
//!
//! Extraction never fails on message content. Malformed or empty input
//! produces an empty [`FinancialFacts`] aggregate.

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::advice::{Insight, InsightKind};
use crate::error::Result;
use crate::models::{
    AssetFact, AssetKind, DebtFact, DebtKind, ExpenseCategory, ExpenseFact, FinancialFacts,
    Frequency, GoalCategory, GoalFact, IncomeFact, RawMessage, RiskLevel, RiskProfileFact, Role,
    TimeUnit, Timeframe,
};
use crate::normalize::categorize_expense;

// Keyword tables for bucket classification. Matching is substring-based on
// lowercased text; a message can match any number of buckets.
const INCOME_KEYWORDS: &[&str] = &["earn", "income", "salary", "wage", "make"];
const EXPENSE_KEYWORDS: &[&str] = &["spend", "cost", "expenses", "bills", "rent", "mortgage"];
const GOAL_KEYWORDS: &[&str] = &[
    "goal", "want", "plan", "save for", "buy", "retire", "house",
];
const RISK_KEYWORDS: &[&str] = &["risk", "safe", "conservative", "aggressive", "volatile"];
const ASSET_KEYWORDS: &[&str] = &[
    "saving", "saved", "pension pot", "isa", "portfolio", "own", "worth",
];
const DEBT_KEYWORDS: &[&str] = &["owe", "debt", "loan", "credit card", "borrowed"];

// Risk level groups, evaluated first-match-wins in this order.
const RISK_GROUPS: &[(RiskLevel, &[&str])] = &[
    (
        RiskLevel::Low,
        &["safe", "conservative", "low risk", "cautious", "careful"],
    ),
    (
        RiskLevel::High,
        &["aggressive", "high risk", "volatile", "risky", "adventurous"],
    ),
    (RiskLevel::Medium, &["medium", "moderate", "balanced"]),
];

// Goal category patterns. Every matching category is kept.
const GOAL_CATEGORY_RULES: &[(GoalCategory, &str)] = &[
    (GoalCategory::Retirement, r"retir|pension"),
    (GoalCategory::House, r"house|home|property|flat|deposit"),
    (GoalCategory::Emergency, r"emergency|rainy day"),
    (GoalCategory::Education, r"education|university|school|tuition"),
    (GoalCategory::Travel, r"travel|holiday|trip"),
    (GoalCategory::Debt, r"debt|loan|credit"),
    (GoalCategory::Investment, r"invest|stocks|shares|portfolio"),
];

/// A scanned amount candidate with its span in the source text
struct AmountMatch {
    pattern: usize,
    start: usize,
    end: usize,
    value: f64,
}

/// Compiled extraction engine.
///
/// Construct once and reuse; all regexes are compiled in [`FactExtractor::new`].
pub struct FactExtractor {
    /// Amount patterns paired with their value multiplier
    amount_patterns: Vec<(Regex, f64)>,
    year_pattern: Regex,
    month_pattern: Regex,
    week_pattern: Regex,
    age_pattern: Regex,
    goal_patterns: Vec<(GoalCategory, Regex)>,
}

impl FactExtractor {
    pub fn new() -> Result<Self> {
        let amount_patterns = vec![
            (Regex::new(r"£([0-9][0-9,]*(?:\.[0-9]{1,2})?)")?, 1.0),
            (
                Regex::new(r"([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*(?:pounds|quid)\b")?,
                1.0,
            ),
            (Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*k\b")?, 1000.0),
            (Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*thousand\b")?, 1000.0),
        ];
        let goal_patterns = GOAL_CATEGORY_RULES
            .iter()
            .map(|(cat, pat)| Ok((*cat, Regex::new(pat)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            amount_patterns,
            year_pattern: Regex::new(r"([0-9]+)\s*years?\b")?,
            month_pattern: Regex::new(r"([0-9]+)\s*months?\b")?,
            week_pattern: Regex::new(r"([0-9]+)\s*weeks?\b")?,
            age_pattern: Regex::new(r"\b(?:at|by)\s+(?:age\s+)?([0-9]{1,2})\b")?,
            goal_patterns,
        })
    }

    /// Extract financial facts from a conversation.
    ///
    /// Only `user` messages are scanned, in order. Returns an empty
    /// aggregate for empty input; never fails on message content.
    pub fn extract(&self, messages: &[RawMessage]) -> FinancialFacts {
        let mut facts = FinancialFacts::default();

        for message in messages {
            if message.role != Role::User {
                continue;
            }
            let text = message.text.to_lowercase();
            if text.trim().is_empty() {
                continue;
            }
            self.scan_message(&text, &message.text, message.timestamp, &mut facts);
        }

        debug!(
            income = facts.income.len(),
            expenses = facts.expenses.len(),
            goals = facts.goals.len(),
            assets = facts.assets.len(),
            debts = facts.debts.len(),
            "Extraction complete"
        );
        facts
    }

    fn scan_message(
        &self,
        lower: &str,
        original: &str,
        timestamp: DateTime<Utc>,
        facts: &mut FinancialFacts,
    ) {
        let amounts = self.scan_amounts(lower);
        let timeframes = self.scan_timeframes(lower);

        if matches_any(lower, INCOME_KEYWORDS) {
            facts.income.push(IncomeFact {
                text: original.to_string(),
                amounts: amounts.clone(),
                frequency: detect_frequency(lower).unwrap_or(Frequency::Yearly),
                timestamp,
            });
        }

        if matches_any(lower, EXPENSE_KEYWORDS) {
            facts.expenses.push(ExpenseFact {
                text: original.to_string(),
                amounts: amounts.clone(),
                frequency: detect_frequency(lower).unwrap_or(Frequency::Monthly),
                category: categorize_expense(lower),
                timestamp,
            });
        }

        if matches_any(lower, GOAL_KEYWORDS) {
            facts.goals.push(GoalFact {
                text: original.to_string(),
                categories: self.categorize_goal(lower),
                amounts: amounts.clone(),
                timeframes: timeframes.clone(),
                timestamp,
            });
        }

        if matches_any(lower, ASSET_KEYWORDS) {
            facts.assets.push(AssetFact {
                text: original.to_string(),
                amounts: amounts.clone(),
                kind: classify_asset(lower),
                timestamp,
            });
        }

        if matches_any(lower, DEBT_KEYWORDS) {
            facts.debts.push(DebtFact {
                text: original.to_string(),
                amounts,
                kind: classify_debt(lower),
                timestamp,
            });
        }

        if matches_any(lower, RISK_KEYWORDS) {
            let level = assess_risk_level(lower);
            debug!(level = level.as_str(), "Risk statement detected");
            // Last statement wins
            facts.risk_tolerance = Some(RiskProfileFact {
                text: original.to_string(),
                level,
                timestamp,
            });
        }
    }

    /// Scan a message for monetary amounts.
    ///
    /// Patterns are applied in a fixed order (£-prefixed, "pounds"/"quid"
    /// suffixed, "k" suffixed, "thousand" suffixed) and results keep that
    /// pattern-major ordering. Overlapping candidates are resolved in favor
    /// of the span extending further right, so "£5k" parses as 5000 rather
    /// than 5 and 5000. The ×1000 multiplier applies only to its own
    /// matched token.
    pub fn scan_amounts(&self, lower: &str) -> Vec<f64> {
        let mut candidates: Vec<AmountMatch> = Vec::new();
        for (idx, (pattern, multiplier)) in self.amount_patterns.iter().enumerate() {
            for caps in pattern.captures_iter(lower) {
                let whole = caps.get(0).map(|m| (m.start(), m.end()));
                let digits = caps.get(1).map(|m| m.as_str());
                if let (Some((start, end)), Some(digits)) = (whole, digits) {
                    if let Ok(value) = digits.replace(',', "").parse::<f64>() {
                        candidates.push(AmountMatch {
                            pattern: idx,
                            start,
                            end,
                            value: value * multiplier,
                        });
                    }
                }
            }
        }

        // Spans reaching further right claim their region first.
        candidates.sort_by(|a, b| b.end.cmp(&a.end).then(a.pattern.cmp(&b.pattern)));
        let mut accepted: Vec<AmountMatch> = Vec::new();
        for c in candidates {
            if accepted
                .iter()
                .all(|a| c.end <= a.start || c.start >= a.end)
            {
                accepted.push(c);
            }
        }

        accepted.sort_by(|a, b| a.pattern.cmp(&b.pattern).then(a.start.cmp(&b.start)));
        accepted.into_iter().map(|c| c.value).collect()
    }

    /// Scan a message for durations and target ages
    pub fn scan_timeframes(&self, lower: &str) -> Vec<Timeframe> {
        let mut timeframes = Vec::new();
        for (pattern, unit) in [
            (&self.year_pattern, TimeUnit::Years),
            (&self.month_pattern, TimeUnit::Months),
            (&self.week_pattern, TimeUnit::Weeks),
        ] {
            for caps in pattern.captures_iter(lower) {
                if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                    timeframes.push(Timeframe::new(value, unit));
                }
            }
        }
        for caps in self.age_pattern.captures_iter(lower) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                // Two-digit matches below adulthood are durations or noise
                if value >= 18 {
                    timeframes.push(Timeframe::new(value, TimeUnit::Age));
                }
            }
        }
        timeframes
    }

    /// All goal categories the text matches; may be empty or multiple
    pub fn categorize_goal(&self, lower: &str) -> Vec<GoalCategory> {
        self.goal_patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(lower))
            .map(|(category, _)| *category)
            .collect()
    }
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Detect an explicit payment frequency mention, if any
fn detect_frequency(lower: &str) -> Option<Frequency> {
    if lower.contains("per week") || lower.contains("a week") || lower.contains("weekly") {
        Some(Frequency::Weekly)
    } else if lower.contains("per month") || lower.contains("a month") || lower.contains("monthly")
    {
        Some(Frequency::Monthly)
    } else if lower.contains("per quarter") || lower.contains("quarterly") {
        Some(Frequency::Quarterly)
    } else if lower.contains("per year")
        || lower.contains("a year")
        || lower.contains("per annum")
        || lower.contains("annually")
        || lower.contains("yearly")
    {
        Some(Frequency::Yearly)
    } else {
        None
    }
}

/// First-match-wins risk assessment over the ordered level groups
fn assess_risk_level(lower: &str) -> RiskLevel {
    for (level, keywords) in RISK_GROUPS {
        if matches_any(lower, keywords) {
            return *level;
        }
    }
    RiskLevel::Unknown
}

fn classify_asset(lower: &str) -> AssetKind {
    if lower.contains("pension") {
        AssetKind::Pension
    } else if lower.contains("property") || lower.contains("house worth") {
        AssetKind::Property
    } else if lower.contains("invest")
        || lower.contains("portfolio")
        || lower.contains("stocks")
        || lower.contains("shares")
        || lower.contains("isa")
    {
        AssetKind::Investments
    } else if lower.contains("saving") || lower.contains("saved") || lower.contains("cash") {
        AssetKind::Savings
    } else {
        AssetKind::Other
    }
}

fn classify_debt(lower: &str) -> DebtKind {
    if lower.contains("mortgage") {
        DebtKind::Mortgage
    } else if lower.contains("credit card") {
        DebtKind::CreditCard
    } else if lower.contains("student loan") {
        DebtKind::StudentLoan
    } else if lower.contains("loan") {
        DebtKind::Loan
    } else {
        DebtKind::Other
    }
}

/// Weighted completion score for an extracted aggregate.
///
/// Weights: income 25, expenses 20, goals 30, risk tolerance 15, assets 10.
/// A section counts when non-empty. Clamped to 100.
pub fn calculate_completion_score(facts: &FinancialFacts) -> u8 {
    let mut score: u32 = 0;
    if !facts.income.is_empty() {
        score += 25;
    }
    if !facts.expenses.is_empty() {
        score += 20;
    }
    if !facts.goals.is_empty() {
        score += 30;
    }
    if facts.risk_tolerance.is_some() {
        score += 15;
    }
    if !facts.assets.is_empty() {
        score += 10;
    }
    score.min(100) as u8
}

/// Derive conversational insights from extracted facts.
///
/// Pure view over the aggregate: average stated income, de-duplicated goal
/// list, and risk level when known.
pub fn generate_insights(facts: &FinancialFacts) -> Vec<Insight> {
    let mut insights = Vec::new();

    let income_amounts: Vec<f64> = facts
        .income
        .iter()
        .flat_map(|f| f.amounts.iter().copied())
        .collect();
    if !income_amounts.is_empty() {
        let average = income_amounts.iter().sum::<f64>() / income_amounts.len() as f64;
        insights.push(Insight {
            kind: InsightKind::Info,
            category: "income".to_string(),
            message: format!(
                "You mentioned income of around £{:.0} across {} statement{}",
                average,
                facts.income.len(),
                if facts.income.len() == 1 { "" } else { "s" }
            ),
        });
    }

    let mut goal_names: Vec<&str> = Vec::new();
    for goal in &facts.goals {
        for category in &goal.categories {
            if !goal_names.contains(&category.as_str()) {
                goal_names.push(category.as_str());
            }
        }
    }
    if !goal_names.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Info,
            category: "goals".to_string(),
            message: format!("Goals identified: {}", goal_names.join(", ")),
        });
    }

    if let Some(risk) = &facts.risk_tolerance {
        insights.push(Insight {
            kind: InsightKind::Info,
            category: "risk".to_string(),
            message: format!("Your risk tolerance appears to be {}", risk.level),
        });
    }

    insights
}

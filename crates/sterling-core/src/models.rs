//! Data model for the Sterling planning engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single conversation message as received from the chat layer.
///
/// Immutable input to extraction; only `user` messages are scanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl RawMessage {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp,
        }
    }
}

/// How often an income or expense amount recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Number of periods in one year
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
            Self::Quarterly => 4.0,
            Self::Yearly => 1.0,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

/// Unit for a parsed timeframe ("in 5 years", "at 65")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    /// A target age rather than a duration ("retire at 65")
    Age,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Age => "age",
        }
    }
}

/// A duration or target age mentioned alongside a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub value: u32,
    pub unit: TimeUnit,
}

impl Timeframe {
    pub fn new(value: u32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }
}

/// Expense category assigned by keyword classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Housing,
    Food,
    Transport,
    Utilities,
    Insurance,
    Entertainment,
    Healthcare,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Utilities => "utilities",
            Self::Insurance => "insurance",
            Self::Entertainment => "entertainment",
            Self::Healthcare => "healthcare",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category tag for an extracted goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Retirement,
    House,
    Emergency,
    Education,
    Travel,
    Debt,
    Investment,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retirement => "retirement",
            Self::House => "house",
            Self::Emergency => "emergency",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Debt => "debt",
            Self::Investment => "investment",
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of asset mentioned in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Pension,
    Property,
    Savings,
    Investments,
    Other,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Property => "property",
            Self::Savings => "savings",
            Self::Investments => "investments",
            Self::Other => "other",
        }
    }
}

/// Kind of debt mentioned in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    Mortgage,
    CreditCard,
    Loan,
    StudentLoan,
    Other,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mortgage => "mortgage",
            Self::CreditCard => "credit_card",
            Self::Loan => "loan",
            Self::StudentLoan => "student_loan",
            Self::Other => "other",
        }
    }
}

/// Investment risk appetite stated by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// An income statement extracted from a message.
///
/// `amounts` holds every monetary match in the message, in order;
/// callers treat `amounts[0]` as the primary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeFact {
    pub text: String,
    pub amounts: Vec<f64>,
    pub frequency: Frequency,
    pub timestamp: DateTime<Utc>,
}

impl IncomeFact {
    /// Primary amount, or 0 if no amount was parsed
    pub fn primary_amount(&self) -> f64 {
        self.amounts.first().copied().unwrap_or(0.0)
    }
}

/// An expense statement extracted from a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFact {
    pub text: String,
    pub amounts: Vec<f64>,
    pub frequency: Frequency,
    pub category: ExpenseCategory,
    pub timestamp: DateTime<Utc>,
}

impl ExpenseFact {
    pub fn primary_amount(&self) -> f64 {
        self.amounts.first().copied().unwrap_or(0.0)
    }
}

/// A goal statement extracted from a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalFact {
    pub text: String,
    /// All goal categories the text matched; may be empty
    pub categories: Vec<GoalCategory>,
    pub amounts: Vec<f64>,
    pub timeframes: Vec<Timeframe>,
    pub timestamp: DateTime<Utc>,
}

/// An asset statement extracted from a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFact {
    pub text: String,
    pub amounts: Vec<f64>,
    pub kind: AssetKind,
    pub timestamp: DateTime<Utc>,
}

impl AssetFact {
    pub fn primary_amount(&self) -> f64 {
        self.amounts.first().copied().unwrap_or(0.0)
    }
}

/// A debt statement extracted from a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtFact {
    pub text: String,
    pub amounts: Vec<f64>,
    pub kind: DebtKind,
    pub timestamp: DateTime<Utc>,
}

impl DebtFact {
    pub fn primary_amount(&self) -> f64 {
        self.amounts.first().copied().unwrap_or(0.0)
    }
}

/// The user's stated risk tolerance.
///
/// At most one per conversation; a later risk statement replaces an
/// earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfileFact {
    pub text: String,
    pub level: RiskLevel,
    pub timestamp: DateTime<Utc>,
}

/// Everything extracted from one conversation.
///
/// Buckets preserve message order. Owned by the extractor during a pass;
/// downstream consumers treat it as a read-only value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFacts {
    pub income: Vec<IncomeFact>,
    pub expenses: Vec<ExpenseFact>,
    pub goals: Vec<GoalFact>,
    pub assets: Vec<AssetFact>,
    pub debts: Vec<DebtFact>,
    pub risk_tolerance: Option<RiskProfileFact>,
}

impl FinancialFacts {
    /// Parse a stored facts payload, as persisted by a host application
    /// that wants to re-plan without re-extracting the conversation.
    pub fn from_json(data: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
            && self.expenses.is_empty()
            && self.goals.is_empty()
            && self.assets.is_empty()
            && self.debts.is_empty()
            && self.risk_tolerance.is_none()
    }

    /// Total value of assets of one kind (primary amounts)
    pub fn asset_total(&self, kind: AssetKind) -> f64 {
        self.assets
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.primary_amount())
            .sum()
    }

    /// Total outstanding debt (primary amounts)
    pub fn debt_total(&self) -> f64 {
        self.debts.iter().map(|d| d.primary_amount()).sum()
    }
}

/// Income tax and National Insurance due on a gross annual income
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub income_tax: f64,
    pub national_insurance: f64,
    pub total_deductions: f64,
    /// Whole-percent effective deduction rate; 0 when gross is 0
    pub effective_rate: u8,
}

impl TaxAssessment {
    pub fn zero() -> Self {
        Self {
            income_tax: 0.0,
            national_insurance: 0.0,
            total_deductions: 0.0,
            effective_rate: 0,
        }
    }
}

/// One income source contributing to a normalized income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub description: String,
    pub frequency: Frequency,
    pub annual_gross: f64,
}

/// Income converted to monthly/annual equivalents with tax applied.
///
/// Derived, recomputed from `FinancialFacts` on every call; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIncome {
    pub monthly_gross: f64,
    pub monthly_net: f64,
    pub annual_gross: f64,
    pub annual_net: f64,
    pub tax: TaxAssessment,
    pub sources: Vec<IncomeSource>,
}

/// Expenses converted to monthly equivalents, totalled per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedExpenses {
    pub monthly_total: f64,
    pub annual_total: f64,
    pub categories: BTreeMap<ExpenseCategory, f64>,
}

/// The kind of plan a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Retirement,
    HousePurchase,
    Investment,
    Protection,
    Comprehensive,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retirement => "retirement",
            Self::HousePurchase => "house_purchase",
            Self::Investment => "investment",
            Self::Protection => "protection",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// All plannable goal types
    pub fn all() -> &'static [GoalType] {
        &[
            Self::Retirement,
            Self::HousePurchase,
            Self::Investment,
            Self::Protection,
            Self::Comprehensive,
        ]
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retirement" => Ok(Self::Retirement),
            "house_purchase" | "house" => Ok(Self::HousePurchase),
            "investment" => Ok(Self::Investment),
            "protection" => Ok(Self::Protection),
            "comprehensive" => Ok(Self::Comprehensive),
            _ => Err(format!("Unknown goal type: {}", s)),
        }
    }
}

/// A multi-year growth projection for a contribution stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub years: u32,
    pub projected_value: f64,
    pub total_contributions: f64,
    pub investment_growth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::Weekly.periods_per_year(), 52.0);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4.0);
        assert_eq!(Frequency::from_str("monthly").unwrap(), Frequency::Monthly);
        assert!(Frequency::from_str("fortnightly").is_err());
    }

    #[test]
    fn test_goal_type_round_trip() {
        for goal in GoalType::all() {
            assert_eq!(GoalType::from_str(goal.as_str()).unwrap(), *goal);
        }
        // Short alias accepted on input
        assert_eq!(
            GoalType::from_str("house").unwrap(),
            GoalType::HousePurchase
        );
    }

    #[test]
    fn test_facts_empty_and_totals() {
        let mut facts = FinancialFacts::default();
        assert!(facts.is_empty());

        facts.assets.push(AssetFact {
            text: "pension worth 40k".into(),
            amounts: vec![40000.0],
            kind: AssetKind::Pension,
            timestamp: Utc::now(),
        });
        facts.assets.push(AssetFact {
            text: "savings of 5000".into(),
            amounts: vec![5000.0],
            kind: AssetKind::Savings,
            timestamp: Utc::now(),
        });

        assert!(!facts.is_empty());
        assert_eq!(facts.asset_total(AssetKind::Pension), 40000.0);
        assert_eq!(facts.asset_total(AssetKind::Savings), 5000.0);
        assert_eq!(facts.asset_total(AssetKind::Property), 0.0);
    }

    #[test]
    fn test_primary_amount_defaults_to_zero() {
        let fact = IncomeFact {
            text: "I earn a good salary".into(),
            amounts: vec![],
            frequency: Frequency::Yearly,
            timestamp: Utc::now(),
        };
        assert_eq!(fact.primary_amount(), 0.0);
    }
}

//! Income and expense normalization
//!
//! Converts every fact to monthly/annual equivalents and applies the UK tax
//! assessment from [`crate::tax`]. Normalization is deterministic: the same
//! facts always produce the same normalized values, and nothing here is
//! cached or persisted.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    ExpenseCategory, ExpenseFact, Frequency, IncomeFact, IncomeSource, NormalizedExpenses,
    NormalizedIncome,
};
use crate::tax::TaxYearConfig;

// Expense category keywords, checked in order; first matching category wins.
// Insurance precedes transport so "car insurance" lands in insurance.
const EXPENSE_CATEGORY_RULES: &[(ExpenseCategory, &[&str])] = &[
    (
        ExpenseCategory::Housing,
        &["rent", "mortgage", "housing", "council tax"],
    ),
    (
        ExpenseCategory::Insurance,
        &["insurance", "life cover", "premium"],
    ),
    (
        ExpenseCategory::Healthcare,
        &["health", "dental", "medical", "prescription"],
    ),
    (
        ExpenseCategory::Utilities,
        &[
            "utilities",
            "electric",
            "gas bill",
            "water",
            "broadband",
            "internet",
            "phone",
        ],
    ),
    (
        ExpenseCategory::Transport,
        &["transport", "car", "fuel", "petrol", "train", "commut", "bus"],
    ),
    (
        ExpenseCategory::Food,
        &["food", "grocer", "supermarket", "eating", "dining"],
    ),
    (
        ExpenseCategory::Entertainment,
        &[
            "entertainment",
            "streaming",
            "subscription",
            "gym",
            "going out",
            "hobb",
            "holiday",
        ],
    ),
];

/// Convert an amount at a given frequency to its annual equivalent
pub fn convert_to_annual(amount: f64, frequency: Frequency) -> f64 {
    amount * frequency.periods_per_year()
}

/// Convert an amount at a given frequency to its monthly equivalent
pub fn convert_to_monthly(amount: f64, frequency: Frequency) -> f64 {
    convert_to_annual(amount, frequency) / 12.0
}

/// Keyword-based expense categorization over lowercased text
pub fn categorize_expense(lower: &str) -> ExpenseCategory {
    for (category, keywords) in EXPENSE_CATEGORY_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *category;
        }
    }
    debug!(text = lower, "Expense fell through to 'other'");
    ExpenseCategory::Other
}

/// Normalize income facts to monthly/annual gross and net figures.
///
/// Each fact's primary amount is converted to an annual equivalent; tax and
/// NI are assessed on the combined annual gross.
pub fn normalize_income(income: &[IncomeFact], config: &TaxYearConfig) -> NormalizedIncome {
    let mut annual_gross = 0.0;
    let mut sources = Vec::with_capacity(income.len());

    for fact in income {
        let annual = convert_to_annual(fact.primary_amount(), fact.frequency);
        annual_gross += annual;
        sources.push(IncomeSource {
            description: fact.text.clone(),
            frequency: fact.frequency,
            annual_gross: annual,
        });
    }

    let tax = config.calculate_tax_and_ni(annual_gross);
    let annual_net = annual_gross - tax.total_deductions;

    NormalizedIncome {
        monthly_gross: annual_gross / 12.0,
        monthly_net: annual_net / 12.0,
        annual_gross,
        annual_net,
        tax,
        sources,
    }
}

/// Normalize expense facts to monthly equivalents, totalled per category
pub fn normalize_expenses(expenses: &[ExpenseFact]) -> NormalizedExpenses {
    let mut categories: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
    let mut monthly_total = 0.0;

    for fact in expenses {
        let monthly = convert_to_monthly(fact.primary_amount(), fact.frequency);
        *categories.entry(fact.category).or_insert(0.0) += monthly;
        monthly_total += monthly;
    }

    NormalizedExpenses {
        monthly_total,
        annual_total: monthly_total * 12.0,
        categories,
    }
}

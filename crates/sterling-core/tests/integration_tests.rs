//! Integration tests for sterling-core
//!
//! These tests exercise the full conversation → extraction → normalization
//! → planning workflow.

use chrono::{TimeZone, Utc};

use sterling_core::{
    assess_financial_health, calculate_completion_score, generate_action_items,
    generate_financial_plan, generate_plan_insights, FactExtractor, GoalType, Priority,
    RawMessage, TaxYearConfig,
};

/// A realistic conversation covering every fact bucket
fn full_conversation() -> Vec<RawMessage> {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    [
        "Hi, I'd like some help planning my finances",
        "I earn £55,000 per year as a software engineer",
        "I spend about £1,400 a month on rent and another £400 on bills and food",
        "I have £15,000 in savings",
        "My pension pot is worth £40,000",
        "I owe £2,400 on my credit card",
        "My goal is to buy a £350,000 house in 4 years",
        "I'd also like to retire at 60",
        "I'd say I'm a balanced investor when it comes to risk",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| RawMessage::user(*text, base + chrono::Duration::minutes(i as i64)))
    .collect()
}

// =============================================================================
// Extraction workflow
// =============================================================================

#[test]
fn test_full_extraction_workflow() {
    let extractor = FactExtractor::new().expect("Failed to build extractor");
    let facts = extractor.extract(&full_conversation());

    assert!(!facts.income.is_empty());
    assert_eq!(facts.income[0].amounts[0], 55000.0);
    assert!(!facts.expenses.is_empty());
    assert!(!facts.goals.is_empty());
    assert!(!facts.assets.is_empty());
    assert!(!facts.debts.is_empty());
    assert_eq!(
        facts.risk_tolerance.as_ref().unwrap().level,
        sterling_core::RiskLevel::Medium
    );

    // Every section present: full completion score
    assert_eq!(calculate_completion_score(&facts), 100);
}

#[test]
fn test_extraction_is_stable_across_calls() {
    let extractor = FactExtractor::new().unwrap();
    let messages = full_conversation();
    assert_eq!(extractor.extract(&messages), extractor.extract(&messages));
}

// =============================================================================
// Planning workflow
// =============================================================================

#[test]
fn test_conversation_to_retirement_plan() {
    let extractor = FactExtractor::new().unwrap();
    let facts = extractor.extract(&full_conversation());
    let tax = TaxYearConfig::load(None).unwrap();

    let response = generate_financial_plan(GoalType::Retirement, &facts, &tax);
    assert!(response.success, "errors: {:?}", response.errors);

    match response.plan.unwrap() {
        sterling_core::GoalPlan::Retirement(plan) => {
            assert_eq!(plan.retirement_age, 60);
            // The stated £40k pension pot reduces the shortfall
            assert_eq!(plan.existing_pension, 40000.0);
            assert!(plan.pot_shortfall < plan.required_pot);
            assert_eq!(plan.projections.len(), 4);
        }
        other => panic!("wrong plan type: {:?}", other.goal_type()),
    }
}

#[test]
fn test_conversation_to_house_plan_uses_goal() {
    let extractor = FactExtractor::new().unwrap();
    let facts = extractor.extract(&full_conversation());
    let tax = TaxYearConfig::load(None).unwrap();

    let response = generate_financial_plan(GoalType::HousePurchase, &facts, &tax);
    match response.plan.unwrap() {
        sterling_core::GoalPlan::HousePurchase(plan) => {
            assert_eq!(plan.target_price, 350000.0);
            assert_eq!(plan.timeframe_years, 4);
            // £15k of stated savings counts towards the deposit
            assert_eq!(plan.existing_savings, 15000.0);
        }
        other => panic!("wrong plan type: {:?}", other.goal_type()),
    }
}

#[test]
fn test_comprehensive_plan_end_to_end() {
    let extractor = FactExtractor::new().unwrap();
    let facts = extractor.extract(&full_conversation());
    let tax = TaxYearConfig::load(None).unwrap();

    let response = generate_financial_plan(GoalType::Comprehensive, &facts, &tax);
    let plan = response.plan.unwrap();
    let health = assess_financial_health(&facts, &tax);

    let insights = generate_plan_insights(&plan, &health);
    assert!(!insights.is_empty());

    let actions = generate_action_items(&plan, &health);
    assert!(!actions.is_empty());
    // High-priority actions come first
    if actions.len() > 1 {
        assert!(actions[0].priority.rank() >= actions[actions.len() - 1].priority.rank());
    }

    match plan {
        sterling_core::GoalPlan::Comprehensive(p) => {
            // Credit-card debt puts the debt step in the priority list
            assert!(p.priorities.iter().any(|i| i.name == "High-interest debt"));
        }
        other => panic!("wrong plan type: {:?}", other.goal_type()),
    }
}

#[test]
fn test_plan_rejected_for_incomplete_conversation() {
    let extractor = FactExtractor::new().unwrap();
    let facts = extractor.extract(&[RawMessage::user(
        "I want to retire at 60",
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    )]);
    let tax = TaxYearConfig::load(None).unwrap();

    let response = generate_financial_plan(GoalType::Retirement, &facts, &tax);
    assert!(!response.success);
    assert!(response.plan.is_none());
    assert_eq!(response.errors.len(), 2);
}

// =============================================================================
// Stored-facts round trip
// =============================================================================

#[test]
fn test_facts_survive_json_round_trip_into_planner() {
    let extractor = FactExtractor::new().unwrap();
    let facts = extractor.extract(&full_conversation());

    // Facts stored by a host application and re-loaded without re-parsing
    let json = serde_json::to_string(&facts).unwrap();
    let restored = sterling_core::FinancialFacts::from_json(&json).unwrap();
    assert_eq!(facts, restored);

    let tax = TaxYearConfig::load(None).unwrap();
    let a = generate_financial_plan(GoalType::Investment, &facts, &tax);
    let b = generate_financial_plan(GoalType::Investment, &restored, &tax);
    assert_eq!(a, b);
}

#[test]
fn test_budget_alert_when_overspending() {
    let extractor = FactExtractor::new().unwrap();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let facts = extractor.extract(&[
        RawMessage::user("I earn £20,000 a year", base),
        RawMessage::user("I spend £1,600 a month on rent and bills", base),
    ]);
    let tax = TaxYearConfig::load(None).unwrap();
    let health = assess_financial_health(&facts, &tax);
    assert!(health.monthly_surplus <= 0.0);

    let response = generate_financial_plan(GoalType::Investment, &facts, &tax);
    let actions = generate_action_items(&response.plan.unwrap(), &health);
    assert_eq!(actions[0].priority, Priority::High);
    assert_eq!(actions[0].timeframe, "1 week");
}

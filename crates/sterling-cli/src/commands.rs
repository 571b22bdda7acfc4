//! Command implementations for the Sterling CLI

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::info;

use sterling_core::{
    assess_financial_health, calculate_completion_score, generate_action_items,
    generate_financial_plan, generate_insights, generate_plan_insights, FactExtractor,
    FinancialFacts, GoalType, RawMessage, TaxYearConfig,
};

/// Read a transcript from a file, or stdin when the path is "-"
pub fn load_messages(path: &Path) -> Result<Vec<RawMessage>> {
    let data = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read transcript from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?
    };
    let messages: Vec<RawMessage> =
        serde_json::from_str(&data).context("Transcript is not a JSON message array")?;
    Ok(messages)
}

pub fn load_tax_config(path: Option<&Path>) -> Result<TaxYearConfig> {
    let config = TaxYearConfig::load(path).context("Failed to load tax-year config")?;
    info!(tax_year = %config.tax_year, "Tax config loaded");
    Ok(config)
}

fn extract_facts(file: &Path) -> Result<FinancialFacts> {
    let messages = load_messages(file)?;
    let extractor = FactExtractor::new()?;
    Ok(extractor.extract(&messages))
}

pub fn cmd_extract(file: &Path, json: bool) -> Result<()> {
    let facts = extract_facts(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&facts)?);
        return Ok(());
    }

    println!("Extracted facts:");
    println!("  income statements:  {}", facts.income.len());
    println!("  expense statements: {}", facts.expenses.len());
    println!("  goals:              {}", facts.goals.len());
    println!("  assets:             {}", facts.assets.len());
    println!("  debts:              {}", facts.debts.len());
    println!(
        "  risk tolerance:     {}",
        facts
            .risk_tolerance
            .as_ref()
            .map(|r| r.level.as_str())
            .unwrap_or("not stated")
    );
    println!(
        "\nProfile completeness: {}%",
        calculate_completion_score(&facts)
    );

    let insights = generate_insights(&facts);
    if !insights.is_empty() {
        println!("\nInsights:");
        for insight in insights {
            println!("  - {}", insight.message);
        }
    }
    Ok(())
}

pub fn cmd_plan(file: &Path, goal: &str, tax_config: Option<&Path>, json: bool) -> Result<()> {
    let goal_type = GoalType::from_str(goal)
        .map_err(|e| anyhow::anyhow!("{e}. Valid goals: retirement, house_purchase, investment, protection, comprehensive"))?;
    let facts = extract_facts(file)?;
    let tax = load_tax_config(tax_config)?;

    let response = generate_financial_plan(goal_type, &facts, &tax);
    if !response.success {
        if json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        bail!("Cannot build a plan yet:\n  {}", response.errors.join("\n  "));
    }

    let Some(plan) = response.plan.as_ref() else {
        bail!("Planner reported success without a plan");
    };
    let health = assess_financial_health(&facts, &tax);
    let insights = generate_plan_insights(plan, &health);
    let actions = generate_action_items(plan, &health);

    if json {
        let output = serde_json::json!({
            "plan": plan,
            "health": health,
            "insights": insights,
            "actions": actions,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", plan.summary());

    if !insights.is_empty() {
        println!("\nInsights:");
        for insight in &insights {
            println!("  [{}] {}", insight.kind.as_str(), insight.message);
        }
    }

    if !actions.is_empty() {
        println!("\nNext steps:");
        for action in &actions {
            println!(
                "  [{}] {} ({}) - {}",
                action.priority, action.action, action.timeframe, action.description
            );
        }
    }
    Ok(())
}

pub fn cmd_health(file: &Path, tax_config: Option<&Path>, json: bool) -> Result<()> {
    let facts = extract_facts(file)?;
    let tax = load_tax_config(tax_config)?;
    let health = assess_financial_health(&facts, &tax);

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!(
        "Financial health: {}/100 ({})",
        health.score,
        health.status.as_str()
    );
    println!("  monthly surplus: £{:.2}", health.monthly_surplus);
    println!("  savings rate:    {:.1}%", health.savings_rate);
    println!("  debt to income:  {:.1}%", health.debt_to_income);
    Ok(())
}

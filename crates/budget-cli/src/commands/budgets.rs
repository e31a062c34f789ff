//! Budget command implementations (calculate, list, show, recommend, delete, charts)

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use budget_core::format::{money, money_whole};
use budget_core::store::default_record_name;
use budget_core::{
    charts, load_budget, save_budget, BudgetInput, BudgetRecord, BudgetSnapshot, BudgetStore,
    ChartRenderer, Config, PaycheckContributions, ProjectionSet, RawInput, Recommendation,
    RecommendationKind, RecordSummary, ValidationReport,
};
use chrono::Local;
use serde_json::json;

use super::{as_renderer, engine, renderer, truncate};

fn kind_icon(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Warning => "⚠️ ",
        RecommendationKind::Info => "💡",
        RecommendationKind::Success => "✅",
    }
}

fn print_validation_errors(report: &ValidationReport) {
    println!("❌ Invalid input values:");
    for (field, error) in report.iter() {
        println!("   {}: {}", field, error.reason());
    }
}

fn print_snapshot(snapshot: &BudgetSnapshot, per_paycheck: Option<PaycheckContributions>) {
    println!("💰 Monthly Budget");
    println!("   ─────────────────────────────────────────────");
    println!("   Income:              {:>14}", money(snapshot.monthly_income));
    println!("   Expenses:            {:>14}", money(snapshot.total_expenses));
    println!("   Liquid savings:      {:>14}", money(snapshot.liquid_savings));
    println!("   401k (you):          {:>14}", money(snapshot.monthly_401k_employee));
    println!("   401k (employer):     {:>14}", money(snapshot.monthly_401k_employer));
    println!("   Total savings:       {:>14}", money(snapshot.total_monthly_savings));
    println!();
    println!("   Savings rate:        {:>13.1}%", snapshot.savings_rate);
    println!("   Liquid savings rate: {:>13.1}%", snapshot.liquid_savings_rate);

    if let Some(per_paycheck) = per_paycheck {
        if per_paycheck.employee > 0.0 || per_paycheck.employer > 0.0 {
            println!(
                "   Per paycheck:        {} to 401k, {} employer match",
                money(per_paycheck.employee),
                money(per_paycheck.employer)
            );
        }
    }
}

fn print_projections(projections: &ProjectionSet) {
    println!();
    println!("📈 Projections");
    println!("   Years      Liquid          401k         Total");
    for (horizon, projection) in projections.iter() {
        println!(
            "   {:>5} {:>11} {:>13} {:>13}",
            horizon.years(),
            money_whole(projection.liquid),
            money_whole(projection.retirement_total),
            money_whole(projection.total)
        );
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    println!();
    println!("📋 Recommendations");
    for rec in recommendations {
        println!("   {} {}", kind_icon(rec.kind), rec.title);
        println!("      {}", rec.message);
    }
}

/// One-line description of how paychecks become monthly income
pub fn describe_frequency(input: &BudgetInput) -> String {
    match input.pay_frequency.paychecks_per_year() {
        Some(n) => format!("{} paychecks per year ({})", n, input.pay_frequency),
        None => format!(
            "pay frequency '{}' not recognized, income uses yearly salary / 12",
            input.pay_frequency
        ),
    }
}

/// Per-paycheck amounts saved with a record, if present
fn stored_per_paycheck(record: &BudgetRecord) -> Option<PaycheckContributions> {
    let employee = record.input_data.get("retirement_401k_amount_per_paycheck")?;
    let employer = record.input_data.get("employer_401k_match_amount_per_paycheck")?;
    Some(PaycheckContributions {
        employee: employee.as_f64()?,
        employer: employer.as_f64()?,
    })
}

/// Pick the record name: --name, then a non-blank `name` input field, then the default
fn record_name(name: Option<&str>, raw: &RawInput, config: &Config) -> Result<String> {
    let from_input = raw
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match name.map(str::trim).filter(|s| !s.is_empty()).or(from_input) {
        Some(name) => Ok(name.to_string()),
        None => default_record_name(&config.name_format).context("Failed to name budget"),
    }
}

/// Calculate a budget, print it, and save it when a store is given
pub fn cmd_calculate(
    store: Option<&dyn BudgetStore>,
    config: &Config,
    raw: &RawInput,
    name: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let input = match BudgetInput::from_raw(raw) {
        Ok(input) => input,
        Err(report) => {
            print_validation_errors(&report);
            bail!("Invalid input values ({} field(s))", report.len());
        }
    };

    let engine = engine();
    let snapshot = engine
        .calculate(&input)
        .context("Budget calculation failed")?;
    let projections = engine.project(&snapshot);
    let recommendations = engine.recommend(&snapshot, input.resolved_percents());
    let per_paycheck = PaycheckContributions::from_input(&input);

    let saved = match store {
        Some(store) => {
            let name = record_name(name, raw, config)?;
            let renderer = renderer(config);
            let record = save_budget(
                store,
                as_renderer(renderer.as_ref()),
                name,
                raw,
                &input,
                snapshot.clone(),
            )
            .context("Failed to save budget")?;
            Some(record)
        }
        None => None,
    };

    if json_output {
        let output = json!({
            "id": saved.as_ref().map(|r| r.id),
            "name": saved.as_ref().map(|r| r.name.as_str()),
            "calculations": snapshot,
            "projections": projections,
            "recommendations": recommendations,
            "per_paycheck": per_paycheck,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("   {}", describe_frequency(&input));
    print_snapshot(&snapshot, Some(per_paycheck));
    print_projections(&projections);
    print_recommendations(&recommendations);
    println!();
    match saved {
        Some(record) => {
            println!("✅ Saved as #{} \"{}\"", record.id, record.name);
            if !record.charts.is_empty() {
                println!("   Charts: budget charts {} --out <dir>", record.id);
            }
        }
        None => println!("   (not saved)"),
    }

    Ok(())
}

pub fn cmd_list(store: &dyn BudgetStore) -> Result<()> {
    let budgets: Vec<RecordSummary> = store.list().context("Failed to list budgets")?;

    if budgets.is_empty() {
        println!("No saved budgets. Create one with:");
        println!("  budget calculate --input budget.json");
        return Ok(());
    }

    println!();
    println!("📁 Saved Budgets");
    println!("   ─────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:>4}  {:<24} {:<16} {:>12} {:>12} {:>7}",
        "ID", "Name", "Created", "Income", "Savings", "Rate"
    );
    for budget in &budgets {
        println!(
            "   {:>4}  {:<24} {:<16} {:>12} {:>12} {:>6.1}%",
            budget.id,
            truncate(&budget.name, 24),
            budget
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            money(budget.monthly_income),
            money(budget.total_monthly_savings),
            budget.savings_rate
        );
    }
    println!();
    println!("   {} budget(s)", budgets.len());

    Ok(())
}

pub fn cmd_show(store: &dyn BudgetStore, config: &Config, id: u64, json_output: bool) -> Result<()> {
    let renderer = renderer(config);
    let record = load_budget(store, as_renderer(renderer.as_ref()), id)
        .with_context(|| format!("Failed to load budget {}", id))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!();
    println!("#{} {}", record.id, record.name);
    println!(
        "   Created {}",
        record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!();
    print_snapshot(&record.calculations, stored_per_paycheck(&record));
    print_projections(&record.projections);
    if !record.charts.is_empty() {
        println!();
        let names: Vec<&str> = record.charts.keys().map(String::as_str).collect();
        println!("🖼️  Charts: {}", names.join(", "));
    }
    println!();

    Ok(())
}

pub fn cmd_recommend(store: &dyn BudgetStore, id: u64, json_output: bool) -> Result<()> {
    let record = store
        .get(id)
        .with_context(|| format!("Failed to load budget {}", id))?;
    let recommendations =
        engine().recommend(&record.calculations, record.calculations.percents);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!();
    println!("#{} {}", record.id, record.name);
    print_recommendations(&recommendations);
    println!();

    Ok(())
}

pub fn cmd_delete(store: &dyn BudgetStore, id: u64) -> Result<()> {
    store
        .delete(id)
        .with_context(|| format!("Failed to delete budget {}", id))?;
    println!("🗑️  Deleted budget #{}", id);
    Ok(())
}

/// Decode a budget's charts and write one file per chart into `out_dir`
pub fn cmd_charts(store: &dyn BudgetStore, config: &Config, id: u64, out_dir: &Path) -> Result<()> {
    let Some(renderer) = renderer(config) else {
        bail!("Charts are disabled in config ([charts] enabled = false)");
    };
    let record = load_budget(store, Some(&renderer as &dyn ChartRenderer), id)
        .with_context(|| format!("Failed to load budget {}", id))?;

    if record.charts.is_empty() {
        bail!("No charts available for budget {}", id);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for (name, encoded) in &record.charts {
        let bytes = charts::decode_image(encoded)
            .with_context(|| format!("Chart '{}' is corrupt", name))?;
        let path = out_dir.join(format!(
            "budget-{}-{}.{}",
            record.id,
            name,
            renderer.file_extension()
        ));
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("   Wrote {}", path.display());
    }

    println!("✅ {} chart(s) exported", record.charts.len());
    Ok(())
}

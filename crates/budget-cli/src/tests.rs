//! CLI command tests

use std::fs;

use budget_core::{BudgetStore, Config, JsonFileStore, MemoryStore, RawInput};
use clap::Parser;
use serde_json::json;

use crate::cli::{Cli, Commands};
use crate::commands::{self, truncate};

fn sample_input() -> RawInput {
    json!({
        "yearly_salary": "75000",
        "pay_per_check": "2884.62",
        "pay_frequency": "bi-weekly",
        "retirement_contribution_percent": "10",
        "employer_match_percent": "5",
        "rent_or_mortgage": "1200",
        "car_insurance": "150",
        "phone_bill": "80",
        "miscellaneous": "300"
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn setup_store_with_budget() -> MemoryStore {
    let store = MemoryStore::new();
    commands::cmd_calculate(
        Some(&store),
        &Config::default(),
        &sample_input(),
        Some("Test"),
        false,
    )
    .unwrap();
    store
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_calculate_args() {
    let cli = Cli::try_parse_from([
        "budget",
        "--store",
        "/tmp/b.json",
        "calculate",
        "--set",
        "yearly_salary=60000",
        "-s",
        "phone_bill=80",
        "--no-save",
    ])
    .unwrap();
    assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/b.json")));
    match cli.command {
        Commands::Calculate { set, no_save, .. } => {
            assert_eq!(set, vec!["yearly_salary=60000", "phone_bill=80"]);
            assert!(no_save);
        }
        _ => panic!("expected calculate"),
    }
}

#[test]
fn test_parse_show_requires_id() {
    assert!(Cli::try_parse_from(["budget", "show"]).is_err());
    assert!(Cli::try_parse_from(["budget", "show", "abc"]).is_err());
    assert!(Cli::try_parse_from(["budget", "show", "3", "--json"]).is_ok());
}

// ========== Input Tests ==========

#[test]
fn test_read_input_file_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.json");
    fs::write(&path, r#"{"yearly_salary": 60000, "phone_bill": "80"}"#).unwrap();

    let raw = commands::read_input(Some(&path), &["phone_bill=95".to_string()]).unwrap();
    assert_eq!(raw["yearly_salary"], json!(60000));
    assert_eq!(raw["phone_bill"], json!("95"));
}

#[test]
fn test_read_input_rejects_bad_pairs() {
    let err = commands::read_input(None, &["yearly_salary".to_string()]).unwrap_err();
    assert!(err.to_string().contains("KEY=VALUE"));

    let err = commands::read_input(None, &["=5".to_string()]).unwrap_err();
    assert!(err.to_string().contains("empty key"));
}

#[test]
fn test_read_input_requires_something() {
    assert!(commands::read_input(None, &[]).is_err());
}

#[test]
fn test_read_input_rejects_non_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    let err = commands::read_input(Some(&path), &[]).unwrap_err();
    assert!(err.to_string().contains("JSON object"));
}

#[test]
fn test_read_input_value_may_contain_equals() {
    let raw = commands::read_input(None, &["name=a=b".to_string()]).unwrap();
    assert_eq!(raw["name"], json!("a=b"));
}

// ========== Calculate Command Tests ==========

#[test]
fn test_cmd_calculate_saves_record() {
    let store = setup_store_with_budget();
    assert_eq!(store.count().unwrap(), 1);

    let record = store.get(1).unwrap();
    assert_eq!(record.name, "Test");
    assert!((record.calculations.monthly_401k_total - 937.5).abs() < 0.01);
    assert_eq!(record.charts.len(), 3);
}

#[test]
fn test_cmd_calculate_no_save() {
    let result = commands::cmd_calculate(
        None,
        &Config::default(),
        &sample_input(),
        None,
        true,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_calculate_invalid_input_not_saved() {
    let store = MemoryStore::new();
    let mut raw = sample_input();
    raw.insert("yearly_salary".into(), json!("not_a_number"));
    raw.remove("phone_bill");

    let err = commands::cmd_calculate(Some(&store), &Config::default(), &raw, None, false)
        .unwrap_err();
    assert!(err.to_string().contains("2 field(s)"));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_cmd_calculate_uses_input_name_then_default() {
    let store = MemoryStore::new();
    let mut raw = sample_input();
    raw.insert("name".into(), json!("From Form"));
    commands::cmd_calculate(Some(&store), &Config::default(), &raw, None, false).unwrap();
    assert_eq!(store.get(1).unwrap().name, "From Form");

    commands::cmd_calculate(Some(&store), &Config::default(), &sample_input(), None, false)
        .unwrap();
    assert!(store.get(2).unwrap().name.starts_with("Budget "));
}

#[test]
fn test_cmd_calculate_charts_disabled() {
    let store = MemoryStore::new();
    let config = Config {
        charts_enabled: false,
        ..Config::default()
    };
    commands::cmd_calculate(Some(&store), &config, &sample_input(), None, false).unwrap();
    assert!(store.get(1).unwrap().charts.is_empty());
}

// ========== Record Command Tests ==========

#[test]
fn test_cmd_list() {
    let store = setup_store_with_budget();
    assert!(commands::cmd_list(&store).is_ok());
    assert!(commands::cmd_list(&MemoryStore::new()).is_ok());
}

#[test]
fn test_cmd_show() {
    let store = setup_store_with_budget();
    assert!(commands::cmd_show(&store, &Config::default(), 1, false).is_ok());
    assert!(commands::cmd_show(&store, &Config::default(), 1, true).is_ok());
}

#[test]
fn test_cmd_show_missing() {
    let store = MemoryStore::new();
    let err = commands::cmd_show(&store, &Config::default(), 42, false).unwrap_err();
    assert!(format!("{:#}", err).contains("Not found"));
}

#[test]
fn test_cmd_recommend() {
    let store = setup_store_with_budget();
    assert!(commands::cmd_recommend(&store, 1, false).is_ok());
    assert!(commands::cmd_recommend(&store, 1, true).is_ok());
    assert!(commands::cmd_recommend(&store, 7, false).is_err());
}

#[test]
fn test_cmd_delete() {
    let store = setup_store_with_budget();
    commands::cmd_delete(&store, 1).unwrap();
    assert_eq!(store.count().unwrap(), 0);

    let err = commands::cmd_delete(&store, 1).unwrap_err();
    assert!(err.to_string().contains("Failed to delete budget 1"));
}

#[test]
fn test_cmd_charts_writes_files() {
    let store = setup_store_with_budget();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");

    commands::cmd_charts(&store, &Config::default(), 1, &out).unwrap();

    let svg = fs::read_to_string(out.join("budget-1-expense_breakdown.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(out.join("budget-1-savings_projection.svg").exists());
    assert!(out.join("budget-1-401k_breakdown.svg").exists());
}

#[test]
fn test_cmd_charts_disabled() {
    let store = setup_store_with_budget();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        charts_enabled: false,
        ..Config::default()
    };
    let err = commands::cmd_charts(&store, &config, 1, dir.path()).unwrap_err();
    assert!(err.to_string().contains("disabled"));
}

// ========== Status / Store Tests ==========

#[test]
fn test_cmd_status_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        store_path: dir.path().join("budgets.json"),
        ..Config::default()
    };
    let store = commands::open_store(None, &config);
    assert_eq!(store.path(), config.store_path.as_path());

    commands::cmd_calculate(Some(&store), &config, &sample_input(), Some("On disk"), false)
        .unwrap();
    assert!(config.store_path.exists());
    assert!(commands::cmd_status(&store, &config, None).is_ok());

    let override_path = dir.path().join("other.json");
    let other: JsonFileStore = commands::open_store(Some(&override_path), &config);
    assert_eq!(other.count().unwrap(), 0);
}

#[test]
fn test_load_config_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = commands::load_config(Some(&dir.path().join("missing.toml"))).unwrap();
    assert!(config.charts_enabled);
}

// ========== Helper Tests ==========

#[test]
fn test_describe_frequency() {
    let input = budget_core::BudgetInput::from_raw(&sample_input()).unwrap();
    assert_eq!(
        commands::describe_frequency(&input),
        "26 paychecks per year (bi-weekly)"
    );

    let mut raw = sample_input();
    raw.insert("pay_frequency".into(), json!("fortnightly"));
    let input = budget_core::BudgetInput::from_raw(&raw).unwrap();
    assert!(commands::describe_frequency(&input).contains("not recognized"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer budget name", 10), "a much ...");
    assert_eq!(truncate("Épargne été", 8), "Éparg...");
}

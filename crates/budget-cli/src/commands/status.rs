//! Status command

use std::path::Path;

use anyhow::Result;
use budget_core::config::default_config_path;
use budget_core::{BudgetStore, Config};

pub fn cmd_status(store: &dyn BudgetStore, config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("📊 Budget Status");
    println!("   ─────────────────────────────────────────────────────────────");

    let config_source = config_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());
    match config_source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: (built-in defaults)"),
    }

    println!("   Store: {}", store.location());
    match store.count() {
        Ok(count) => println!("   Saved budgets: {}", count),
        Err(e) => println!("   ❌ Error reading store: {}", e),
    }

    println!();
    if config.charts_enabled {
        println!(
            "   Charts: enabled ({}x{} SVG)",
            config.chart_width, config.chart_height
        );
    } else {
        println!("   Charts: disabled");
    }
    println!("   Default name: {}", config.name_format);
    println!();

    Ok(())
}

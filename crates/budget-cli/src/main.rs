//! Budget CLI - Paycheck budget calculator
//!
//! Usage:
//!   budget calculate --input budget.json    Calculate and save a budget
//!   budget calculate --set yearly_salary=60000 ... --no-save
//!   budget list                             List saved budgets
//!   budget show 1                           Show a saved budget
//!   budget charts 1 --out charts/           Export chart images

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Calculate {
            input,
            set,
            name,
            no_save,
            json,
        } => {
            let raw = commands::read_input(input.as_deref(), &set)?;
            if no_save {
                commands::cmd_calculate(None, &config, &raw, name.as_deref(), json)
            } else {
                let store = commands::open_store(cli.store.as_deref(), &config);
                commands::cmd_calculate(Some(&store), &config, &raw, name.as_deref(), json)
            }
        }
        Commands::List => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_list(&store)
        }
        Commands::Show { id, json } => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_show(&store, &config, id, json)
        }
        Commands::Recommend { id, json } => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_recommend(&store, id, json)
        }
        Commands::Delete { id } => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_delete(&store, id)
        }
        Commands::Charts { id, out } => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_charts(&store, &config, id, &out)
        }
        Commands::Status => {
            let store = commands::open_store(cli.store.as_deref(), &config);
            commands::cmd_status(&store, &config, cli.config.as_deref())
        }
    }
}

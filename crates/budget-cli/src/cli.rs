//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Budget - Turn a paycheck into a monthly plan
#[derive(Parser)]
#[command(name = "budget")]
#[command(about = "Paycheck budget calculator with savings projections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Budget store path (defaults to the configured store)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate a budget and save it
    Calculate {
        /// JSON file with the input fields
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Set a single field, e.g. --set yearly_salary=60000 (repeatable)
        ///
        /// Applied after --input, so these win over values from the file.
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Name for the saved budget (defaults to a timestamped name)
        #[arg(short, long)]
        name: Option<String>,

        /// Compute and print only, don't save
        #[arg(long)]
        no_save: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List saved budgets
    List,

    /// Show a saved budget
    Show {
        /// Budget ID
        id: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show recommendations for a saved budget
    Recommend {
        /// Budget ID
        id: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved budget
    Delete {
        /// Budget ID
        id: u64,
    },

    /// Write the charts of a saved budget to image files
    Charts {
        /// Budget ID
        id: u64,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Show config and store status
    Status,
}

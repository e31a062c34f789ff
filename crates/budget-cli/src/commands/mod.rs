//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, store, input parsing)
//! - `budgets` - Calculate, list, show, recommend, delete, charts
//! - `status` - Config and store status

pub mod budgets;
pub mod core;
pub mod status;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! Budget Core Library
//!
//! Calculation and insight engine for personal budgets:
//! - Input validation and normalization of raw form fields
//! - Pay-frequency conversion to monthly figures
//! - Monthly/yearly savings snapshot and multi-year projections
//! - Rule-based recommendations
//! - Chart series with a pluggable renderer (SVG by default)
//! - Saved-budget store (in-memory or JSON file)

pub mod calculator;
pub mod charts;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod frequency;
pub mod input;
pub mod observer;
pub mod projection;
pub mod recommend;
pub mod store;

pub use calculator::{calculate, compute, BudgetSnapshot, ExpenseBreakdown};
pub use charts::{chart_series, ChartRenderer, ChartSeries, ChartSet, SvgRenderer};
pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use frequency::{to_monthly, MonthlyIncome, PaycheckContributions};
pub use input::{
    BudgetInput, FieldError, PayFrequency, RangeViolation, RawInput, ResolvedPercents,
    ValidationReport,
};
pub use observer::{EngineObserver, TracingObserver};
pub use projection::{project, Horizon, Projection, ProjectionSet};
pub use recommend::{recommend, Recommendation, RecommendationEngine, RecommendationKind, Rule};
pub use store::{
    load_budget, save_budget, BudgetRecord, BudgetStore, JsonFileStore, MemoryStore,
    RecordSummary,
};

//! Observers around the engine entry points
//!
//! The calculation modules never log. Anything that wants timing or outcome
//! information about a `compute` / `recommend` call registers an
//! [`EngineObserver`] on the [`Engine`](crate::engine::Engine) instead.

use std::time::Duration;

use crate::calculator::BudgetSnapshot;
use crate::error::Error;
use crate::recommend::Recommendation;

/// Hooks called by the engine. All methods default to no-ops.
pub trait EngineObserver: Send + Sync {
    fn on_compute_start(&self) {}

    fn on_compute_success(&self, _snapshot: &BudgetSnapshot, _elapsed: Duration) {}

    fn on_compute_failure(&self, _error: &Error, _elapsed: Duration) {}

    fn on_recommend(&self, _recommendations: &[Recommendation], _elapsed: Duration) {}
}

/// Logs engine calls through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn on_compute_start(&self) {
        tracing::trace!("Budget computation started");
    }

    fn on_compute_success(&self, snapshot: &BudgetSnapshot, elapsed: Duration) {
        tracing::info!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            monthly_income = snapshot.monthly_income,
            savings_rate = snapshot.savings_rate,
            "Budget computed"
        );
    }

    fn on_compute_failure(&self, error: &Error, elapsed: Duration) {
        match error {
            Error::Validation(report) => tracing::warn!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                fields = report.len(),
                "Budget input rejected: {}",
                report
            ),
            other => tracing::error!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                error = %other,
                "Budget computation failed"
            ),
        }
    }

    fn on_recommend(&self, recommendations: &[Recommendation], elapsed: Duration) {
        tracing::debug!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            count = recommendations.len(),
            "Recommendations generated"
        );
        for rec in recommendations {
            tracing::trace!(kind = %rec.kind, title = %rec.title, "Recommendation");
        }
    }
}

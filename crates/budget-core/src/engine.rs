//! Engine facade
//!
//! Bundles the stateless entry points (`compute`, `project`, `recommend`)
//! with the registered observers. Cheap to construct and safe to share
//! across threads.

use std::sync::Arc;
use std::time::Instant;

use crate::calculator::{self, BudgetSnapshot};
use crate::error::Result;
use crate::input::{BudgetInput, RawInput, ResolvedPercents};
use crate::observer::EngineObserver;
use crate::projection::{self, ProjectionSet};
use crate::recommend::{Recommendation, RecommendationEngine};

#[derive(Default)]
pub struct Engine {
    observers: Vec<Arc<dyn EngineObserver>>,
    recommender: RecommendationEngine,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; observers are called in registration order
    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validate raw fields and compute a snapshot
    pub fn compute(&self, raw: &RawInput) -> Result<BudgetSnapshot> {
        self.observe_compute(|| calculator::compute(raw))
    }

    /// Compute a snapshot from an already validated input
    pub fn calculate(&self, input: &BudgetInput) -> Result<BudgetSnapshot> {
        self.observe_compute(|| calculator::calculate(input))
    }

    pub fn project(&self, snapshot: &BudgetSnapshot) -> ProjectionSet {
        projection::project(snapshot)
    }

    pub fn recommend(
        &self,
        snapshot: &BudgetSnapshot,
        percents: ResolvedPercents,
    ) -> Vec<Recommendation> {
        let started = Instant::now();
        let recommendations = self.recommender.recommend(snapshot, percents);
        let elapsed = started.elapsed();
        for observer in &self.observers {
            observer.on_recommend(&recommendations, elapsed);
        }
        recommendations
    }

    fn observe_compute<F>(&self, f: F) -> Result<BudgetSnapshot>
    where
        F: FnOnce() -> Result<BudgetSnapshot>,
    {
        for observer in &self.observers {
            observer.on_compute_start();
        }

        let started = Instant::now();
        let result = f();
        let elapsed = started.elapsed();

        for observer in &self.observers {
            match &result {
                Ok(snapshot) => observer.on_compute_success(snapshot, elapsed),
                Err(e) => observer.on_compute_failure(e, elapsed),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counting {
        started: AtomicUsize,
        succeeded: AtomicUsize,
        failed: AtomicUsize,
        recommended: AtomicUsize,
    }

    impl EngineObserver for Counting {
        fn on_compute_start(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_compute_success(&self, _snapshot: &BudgetSnapshot, _elapsed: Duration) {
            self.succeeded.fetch_add(1, Ordering::SeqCst);
        }

        fn on_compute_failure(&self, _error: &Error, _elapsed: Duration) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_recommend(&self, recommendations: &[Recommendation], _elapsed: Duration) {
            self.recommended
                .fetch_add(recommendations.len(), Ordering::SeqCst);
        }
    }

    fn raw(salary: &str) -> RawInput {
        serde_json::json!({
            "yearly_salary": salary,
            "pay_per_check": "2307.69",
            "pay_frequency": "bi-weekly",
            "rent_or_mortgage": "1200",
            "car_insurance": "150",
            "phone_bill": "80",
            "miscellaneous": "300"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_observers_see_success_and_failure() {
        let counter = Arc::new(Counting::default());
        let engine = Engine::new().with_observer(counter.clone());

        let snapshot = engine.compute(&raw("60000")).unwrap();
        assert!(engine.compute(&raw("not_a_number")).is_err());
        let recs = engine.recommend(&snapshot, ResolvedPercents::default());

        assert_eq!(counter.started.load(Ordering::SeqCst), 2);
        assert_eq!(counter.succeeded.load(Ordering::SeqCst), 1);
        assert_eq!(counter.failed.load(Ordering::SeqCst), 1);
        assert_eq!(counter.recommended.load(Ordering::SeqCst), recs.len());
    }

    #[test]
    fn test_engine_without_observers() {
        let engine = Engine::new();
        let snapshot = engine.compute(&raw("60000")).unwrap();
        let projections = engine.project(&snapshot);
        assert_eq!(projections.ten_years.liquid, snapshot.yearly_liquid_savings * 10.0);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = Arc::new(Engine::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.compute(&raw("60000")).unwrap().total_expenses)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1730.0);
        }
    }
}

//! Savings projections
//!
//! Linear extrapolation of the yearly snapshot figures over fixed horizons.
//! No growth or interest is applied.

use serde::{Deserialize, Serialize};

use crate::calculator::BudgetSnapshot;
use crate::error::{Error, Result};

/// Fixed projection horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    OneYear,
    TwoYears,
    TenYears,
}

impl Horizon {
    pub fn all() -> &'static [Horizon] {
        &[Self::OneYear, Self::TwoYears, Self::TenYears]
    }

    pub fn years(&self) -> u32 {
        match self {
            Self::OneYear => 1,
            Self::TwoYears => 2,
            Self::TenYears => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneYear => "1_year",
            Self::TwoYears => "2_years",
            Self::TenYears => "10_years",
        }
    }
}

/// Accumulated savings at one horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub liquid: f64,
    #[serde(rename = "401k_employee")]
    pub retirement_employee: f64,
    #[serde(rename = "401k_employer")]
    pub retirement_employer: f64,
    #[serde(rename = "401k_total")]
    pub retirement_total: f64,
    pub total: f64,
}

impl Projection {
    fn scaled(snapshot: &BudgetSnapshot, years: f64) -> Self {
        Self {
            liquid: snapshot.yearly_liquid_savings * years,
            retirement_employee: snapshot.yearly_401k_employee_savings * years,
            retirement_employer: snapshot.yearly_401k_employer_savings * years,
            retirement_total: snapshot.yearly_401k_total_savings * years,
            total: snapshot.yearly_total_savings * years,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    #[serde(rename = "1_year")]
    pub one_year: Projection,
    #[serde(rename = "2_years")]
    pub two_years: Projection,
    #[serde(rename = "10_years")]
    pub ten_years: Projection,
}

impl ProjectionSet {
    pub fn get(&self, horizon: Horizon) -> &Projection {
        match horizon {
            Horizon::OneYear => &self.one_year,
            Horizon::TwoYears => &self.two_years,
            Horizon::TenYears => &self.ten_years,
        }
    }

    /// Projections in horizon order
    pub fn iter(&self) -> impl Iterator<Item = (Horizon, &Projection)> + '_ {
        Horizon::all().iter().map(move |h| (*h, self.get(*h)))
    }

    /// Fails with the label of the first horizon holding a non-finite figure.
    /// Long horizons can overflow even when the yearly figures are finite.
    pub fn check_finite(&self) -> Result<()> {
        for (horizon, p) in self.iter() {
            let figures = [
                p.liquid,
                p.retirement_employee,
                p.retirement_employer,
                p.retirement_total,
                p.total,
            ];
            if figures.iter().any(|v| !v.is_finite()) {
                return Err(Error::Numeric(horizon.label()));
            }
        }
        Ok(())
    }
}

/// Project a snapshot over every horizon
pub fn project(snapshot: &BudgetSnapshot) -> ProjectionSet {
    let at = |h: Horizon| Projection::scaled(snapshot, f64::from(h.years()));
    ProjectionSet {
        one_year: at(Horizon::OneYear),
        two_years: at(Horizon::TwoYears),
        ten_years: at(Horizon::TenYears),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::input::{BudgetInput, PayFrequency};

    fn snapshot() -> BudgetSnapshot {
        calculate(&BudgetInput {
            yearly_salary: 75000.0,
            pay_per_check: 2884.62,
            pay_frequency: PayFrequency::BiWeekly,
            retirement_contribution_percent: 10.0,
            employer_match_percent: 5.0,
            rent_or_mortgage: 1200.0,
            car_insurance: 150.0,
            phone_bill: 80.0,
            miscellaneous: 300.0,
        })
        .unwrap()
    }

    #[test]
    fn test_projections_are_exact_multiples() {
        let s = snapshot();
        let p = project(&s);

        assert_eq!(p.one_year.liquid, s.yearly_liquid_savings);
        assert_eq!(p.two_years.liquid, s.yearly_liquid_savings * 2.0);
        assert_eq!(p.ten_years.liquid, s.yearly_liquid_savings * 10.0);
        assert_eq!(p.ten_years.retirement_employee, s.yearly_401k_employee_savings * 10.0);
        assert_eq!(p.ten_years.retirement_employer, s.yearly_401k_employer_savings * 10.0);
        assert_eq!(p.two_years.retirement_total, s.yearly_401k_total_savings * 2.0);
        assert_eq!(p.ten_years.total, s.yearly_total_savings * 10.0);
    }

    #[test]
    fn test_iter_in_horizon_order() {
        let p = project(&snapshot());
        let labels: Vec<&str> = p.iter().map(|(h, _)| h.label()).collect();
        assert_eq!(labels, vec!["1_year", "2_years", "10_years"]);
        let years: Vec<u32> = Horizon::all().iter().map(|h| h.years()).collect();
        assert_eq!(years, vec![1, 2, 10]);
    }

    #[test]
    fn test_check_finite_names_overflowing_horizon() {
        assert!(project(&snapshot()).check_finite().is_ok());

        let mut s = snapshot();
        s.yearly_liquid_savings = f64::MAX / 1.5;
        let err = project(&s).check_finite().unwrap_err();
        assert!(matches!(err, Error::Numeric("2_years")));
    }

    #[test]
    fn test_serializes_with_horizon_labels() {
        let value = serde_json::to_value(project(&snapshot())).unwrap();
        assert!(value["10_years"]["401k_total"].is_number());
        assert!(value["1_year"]["liquid"].is_number());
    }
}

//! Budget calculator
//!
//! Combines a validated [`BudgetInput`] into a single-period
//! [`BudgetSnapshot`]. Everything here is a pure function of its input.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frequency::to_monthly;
use crate::input::{BudgetInput, RawInput, ResolvedPercents};

/// Monthly allocation of income.
///
/// The four expense categories plus `liquid_savings` account for the whole
/// monthly income. Retirement figures ride along for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    #[serde(rename = "rent_mortgage")]
    pub rent_or_mortgage: f64,
    pub car_insurance: f64,
    pub phone_bill: f64,
    pub miscellaneous: f64,
    pub liquid_savings: f64,
    #[serde(rename = "401k_employee_savings")]
    pub retirement_employee: f64,
    #[serde(rename = "401k_employer_savings")]
    pub retirement_employer: f64,
    #[serde(rename = "401k_total_savings")]
    pub retirement_total: f64,
}

/// Derived figures for one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub liquid_savings: f64,
    pub monthly_401k_employee: f64,
    pub monthly_401k_employer: f64,
    pub monthly_401k_total: f64,
    pub total_monthly_savings: f64,
    pub yearly_liquid_savings: f64,
    pub yearly_401k_employee_savings: f64,
    pub yearly_401k_employer_savings: f64,
    pub yearly_401k_total_savings: f64,
    pub yearly_total_savings: f64,
    /// Total savings as a percent of income plus employer match
    pub savings_rate: f64,
    /// Liquid savings as a percent of monthly income
    pub liquid_savings_rate: f64,
    pub expense_breakdown: ExpenseBreakdown,
    #[serde(flatten)]
    pub percents: ResolvedPercents,
}

impl BudgetSnapshot {
    /// Income plus the employer match, the base for `savings_rate`
    pub fn gross_monthly_income(&self) -> f64 {
        self.monthly_income + self.monthly_401k_employer
    }

    fn check_finite(&self) -> Result<()> {
        let figures = [
            ("monthly_income", self.monthly_income),
            ("total_expenses", self.total_expenses),
            ("liquid_savings", self.liquid_savings),
            ("monthly_401k_employee", self.monthly_401k_employee),
            ("monthly_401k_employer", self.monthly_401k_employer),
            ("monthly_401k_total", self.monthly_401k_total),
            ("total_monthly_savings", self.total_monthly_savings),
            ("yearly_liquid_savings", self.yearly_liquid_savings),
            ("yearly_401k_employee_savings", self.yearly_401k_employee_savings),
            ("yearly_401k_employer_savings", self.yearly_401k_employer_savings),
            ("yearly_401k_total_savings", self.yearly_401k_total_savings),
            ("yearly_total_savings", self.yearly_total_savings),
            ("savings_rate", self.savings_rate),
            ("liquid_savings_rate", self.liquid_savings_rate),
        ];
        match figures.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(Error::Numeric(*name)),
            None => Ok(()),
        }
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Compute a snapshot from a validated input
pub fn calculate(input: &BudgetInput) -> Result<BudgetSnapshot> {
    let monthly = to_monthly(input);

    let monthly_401k_employee = monthly.employee_contribution;
    let monthly_401k_employer = monthly.employer_contribution;
    let monthly_401k_total = monthly_401k_employee + monthly_401k_employer;

    let total_expenses =
        input.rent_or_mortgage + input.car_insurance + input.phone_bill + input.miscellaneous;
    let liquid_savings = monthly.income - total_expenses;
    let total_monthly_savings = liquid_savings + monthly_401k_total;

    let gross_monthly_income = monthly.income + monthly_401k_employer;

    let snapshot = BudgetSnapshot {
        monthly_income: monthly.income,
        total_expenses,
        liquid_savings,
        monthly_401k_employee,
        monthly_401k_employer,
        monthly_401k_total,
        total_monthly_savings,
        yearly_liquid_savings: liquid_savings * 12.0,
        yearly_401k_employee_savings: monthly_401k_employee * 12.0,
        yearly_401k_employer_savings: monthly_401k_employer * 12.0,
        yearly_401k_total_savings: monthly_401k_total * 12.0,
        yearly_total_savings: total_monthly_savings * 12.0,
        savings_rate: percent_of(total_monthly_savings, gross_monthly_income),
        liquid_savings_rate: percent_of(liquid_savings, monthly.income),
        expense_breakdown: ExpenseBreakdown {
            rent_or_mortgage: input.rent_or_mortgage,
            car_insurance: input.car_insurance,
            phone_bill: input.phone_bill,
            miscellaneous: input.miscellaneous,
            liquid_savings,
            retirement_employee: monthly_401k_employee,
            retirement_employer: monthly_401k_employer,
            retirement_total: monthly_401k_total,
        },
        percents: input.resolved_percents(),
    };

    snapshot.check_finite()?;
    Ok(snapshot)
}

/// Validate a raw field map and compute its snapshot
pub fn compute(raw: &RawInput) -> Result<BudgetSnapshot> {
    let input = BudgetInput::from_raw(raw)?;
    calculate(&input)
}

//! Pay-frequency conversion
//!
//! Maps a paycheck amount and cadence to monthly figures. Retirement and
//! employer-match dollars are computed per paycheck first and then scaled by
//! the same cadence as income.

use serde::{Deserialize, Serialize};

use crate::input::{BudgetInput, PayFrequency};

/// Retirement dollars taken from a single paycheck
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaycheckContributions {
    #[serde(rename = "retirement_401k_amount_per_paycheck")]
    pub employee: f64,
    #[serde(rename = "employer_401k_match_amount_per_paycheck")]
    pub employer: f64,
}

impl PaycheckContributions {
    pub fn from_input(input: &BudgetInput) -> Self {
        Self {
            employee: input.pay_per_check * (input.retirement_contribution_percent / 100.0),
            employer: input.pay_per_check * (input.employer_match_percent / 100.0),
        }
    }
}

/// Monthly-equivalent income and retirement contributions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyIncome {
    pub income: f64,
    pub employee_contribution: f64,
    pub employer_contribution: f64,
}

impl PayFrequency {
    /// Paychecks per year for the known cadences
    pub fn paychecks_per_year(&self) -> Option<u32> {
        match self {
            Self::Weekly => Some(52),
            Self::BiWeekly => Some(26),
            Self::BiMonthly => Some(24),
            Self::Monthly => Some(12),
            Self::Other(_) => None,
        }
    }

    /// Scale a per-paycheck amount to a month
    fn monthly(&self, per_paycheck: f64) -> f64 {
        match self {
            Self::Weekly => per_paycheck * 52.0 / 12.0,
            Self::BiWeekly => per_paycheck * 26.0 / 12.0,
            Self::BiMonthly => per_paycheck * 2.0,
            Self::Monthly | Self::Other(_) => per_paycheck,
        }
    }
}

/// Convert an input to monthly figures.
///
/// Unknown cadences take income from `yearly_salary / 12` but leave the
/// per-paycheck contribution amounts unscaled.
pub fn to_monthly(input: &BudgetInput) -> MonthlyIncome {
    let per_paycheck = PaycheckContributions::from_input(input);
    let freq = &input.pay_frequency;

    let income = match freq {
        PayFrequency::Other(_) => input.yearly_salary / 12.0,
        known => known.monthly(input.pay_per_check),
    };

    MonthlyIncome {
        income,
        employee_contribution: freq.monthly(per_paycheck.employee),
        employer_contribution: freq.monthly(per_paycheck.employer),
    }
}

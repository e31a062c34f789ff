//! Input normalization
//!
//! Turns a loosely-typed field map (as posted by a form or read from a JSON
//! file) into a [`BudgetInput`]. Validation and coercion happen in a single
//! pass: the result is either a complete typed value or a [`ValidationReport`]
//! listing every bad field, never a partially filled input.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Raw field name -> raw value, as received from the caller
pub type RawInput = serde_json::Map<String, Value>;

/// Paycheck cadence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PayFrequency {
    Weekly,
    BiWeekly,
    BiMonthly,
    Monthly,
    /// Any cadence we don't recognize; income falls back to yearly salary / 12
    Other(String),
}

impl PayFrequency {
    /// Parse a cadence label. Unknown labels are kept verbatim as `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "bi-weekly" => Self::BiWeekly,
            "bi-monthly" => Self::BiMonthly,
            "monthly" => Self::Monthly,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::BiMonthly => "bi-monthly",
            Self::Monthly => "monthly",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for PayFrequency {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<PayFrequency> for String {
    fn from(freq: PayFrequency) -> Self {
        freq.as_str().to_string()
    }
}

/// Validated, typed budget input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub yearly_salary: f64,
    pub pay_per_check: f64,
    pub pay_frequency: PayFrequency,
    pub retirement_contribution_percent: f64,
    pub employer_match_percent: f64,
    pub rent_or_mortgage: f64,
    pub car_insurance: f64,
    pub phone_bill: f64,
    pub miscellaneous: f64,
}

/// Retirement percents actually used by a calculation (blank inputs resolve to 0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedPercents {
    #[serde(rename = "retirement_401k_percent")]
    pub retirement_contribution_percent: f64,
    #[serde(rename = "employer_401k_match_percent")]
    pub employer_match_percent: f64,
}

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    MissingField,
    InvalidNumber,
    OutOfRange(RangeViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeViolation {
    Negative,
    PercentOver100,
}

impl FieldError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingField => "field is required",
            Self::InvalidNumber => "must be a valid number",
            Self::OutOfRange(RangeViolation::Negative) => "value must be positive",
            Self::OutOfRange(RangeViolation::PercentOver100) => "percentage cannot exceed 100",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Every field error found in one input, keyed by canonical field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<&'static str, FieldError>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.errors.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> + '_ {
        self.errors.iter().map(|(k, v)| (*k, *v))
    }

    fn insert(&mut self, field: &'static str, error: FieldError) {
        // First error for a field wins
        self.errors.entry(field).or_insert(error);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, err)| format!("{}: {}", field, err))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, err) in &self.errors {
            map.serialize_entry(field, err.reason())?;
        }
        map.end()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Money,
    Percent,
}

struct FieldSpec {
    name: &'static str,
    /// Older field name still accepted
    legacy: Option<&'static str>,
    kind: FieldKind,
    required: bool,
}

impl FieldSpec {
    const fn money(name: &'static str) -> Self {
        Self {
            name,
            legacy: None,
            kind: FieldKind::Money,
            required: true,
        }
    }
}

const YEARLY_SALARY: FieldSpec = FieldSpec::money("yearly_salary");
const PAY_PER_CHECK: FieldSpec = FieldSpec::money("pay_per_check");
const RENT_OR_MORTGAGE: FieldSpec = FieldSpec {
    legacy: Some("rent_mortgage"),
    ..FieldSpec::money("rent_or_mortgage")
};
const CAR_INSURANCE: FieldSpec = FieldSpec::money("car_insurance");
const PHONE_BILL: FieldSpec = FieldSpec::money("phone_bill");
const MISCELLANEOUS: FieldSpec = FieldSpec::money("miscellaneous");
const RETIREMENT_PERCENT: FieldSpec = FieldSpec {
    name: "retirement_contribution_percent",
    legacy: Some("retirement_401k"),
    kind: FieldKind::Percent,
    required: false,
};
const MATCH_PERCENT: FieldSpec = FieldSpec {
    name: "employer_match_percent",
    legacy: Some("employer_401k_match"),
    kind: FieldKind::Percent,
    required: false,
};
const PAY_FREQUENCY: &str = "pay_frequency";

fn lookup<'a>(raw: &'a RawInput, field: &FieldSpec) -> Option<&'a Value> {
    raw.get(field.name)
        .or_else(|| field.legacy.and_then(|legacy| raw.get(legacy)))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_number(value: &Value) -> Result<f64, FieldError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or(FieldError::InvalidNumber)
}

fn coerce_field(raw: &RawInput, field: &FieldSpec) -> Result<f64, FieldError> {
    let value = match lookup(raw, field) {
        Some(v) if !is_blank(v) => v,
        _ if field.required => return Err(FieldError::MissingField),
        _ => return Ok(0.0),
    };

    let number = coerce_number(value)?;
    if number < 0.0 {
        return Err(FieldError::OutOfRange(RangeViolation::Negative));
    }
    if field.kind == FieldKind::Percent && number > 100.0 {
        return Err(FieldError::OutOfRange(RangeViolation::PercentOver100));
    }
    Ok(number)
}

fn coerce_frequency(raw: &RawInput) -> Result<PayFrequency, FieldError> {
    match raw.get(PAY_FREQUENCY) {
        Some(v) if is_blank(v) => Err(FieldError::MissingField),
        Some(Value::String(s)) => Ok(PayFrequency::parse(s)),
        Some(other) => Ok(PayFrequency::Other(other.to_string())),
        None => Err(FieldError::MissingField),
    }
}

impl BudgetInput {
    /// Validate and coerce a raw field map in one pass
    pub fn from_raw(raw: &RawInput) -> Result<Self, ValidationReport> {
        let mut report = ValidationReport::default();

        let mut number = |field: &FieldSpec| match coerce_field(raw, field) {
            Ok(v) => v,
            Err(e) => {
                report.insert(field.name, e);
                0.0
            }
        };

        let yearly_salary = number(&YEARLY_SALARY);
        let pay_per_check = number(&PAY_PER_CHECK);
        let retirement_contribution_percent = number(&RETIREMENT_PERCENT);
        let employer_match_percent = number(&MATCH_PERCENT);
        let rent_or_mortgage = number(&RENT_OR_MORTGAGE);
        let car_insurance = number(&CAR_INSURANCE);
        let phone_bill = number(&PHONE_BILL);
        let miscellaneous = number(&MISCELLANEOUS);

        let pay_frequency = match coerce_frequency(raw) {
            Ok(freq) => Some(freq),
            Err(e) => {
                report.insert(PAY_FREQUENCY, e);
                None
            }
        };

        match pay_frequency {
            Some(pay_frequency) if report.is_empty() => Ok(Self {
                yearly_salary,
                pay_per_check,
                pay_frequency,
                retirement_contribution_percent,
                employer_match_percent,
                rent_or_mortgage,
                car_insurance,
                phone_bill,
                miscellaneous,
            }),
            _ => Err(report),
        }
    }

    pub fn resolved_percents(&self) -> ResolvedPercents {
        ResolvedPercents {
            retirement_contribution_percent: self.retirement_contribution_percent,
            employer_match_percent: self.employer_match_percent,
        }
    }
}
